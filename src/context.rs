//! Explicit context passed to constructors.
//!
//! Holds what would otherwise be process-wide statics: the order number
//! counter and the shop configuration.

use crate::error::{Result, ShopError};
use crate::validate::MAX_AMOUNT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source. Ids are never reused, so ordering by id is
/// insertion order.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> EntryId {
        // a Default-built generator starts at 0; skip it so ids stay 1-based
        if self.next == 0 {
            self.next = 1;
        }
        let id = EntryId(self.next);
        self.next += 1;
        id
    }

    pub fn issued(&self) -> u64 {
        self.next.saturating_sub(1)
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub currency: String,
    /// Sales tax as a fraction, e.g. `0.08` for 8%.
    pub tax_rate: f64,
    pub min_password_length: usize,
    /// Largest single amount any payment method accepts.
    pub payment_limit: f64,
    pub default_loan_days: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tax_rate: 0.08,
            min_password_length: 8,
            payment_limit: 10_000.0,
            default_loan_days: 14,
        }
    }
}

impl ShopConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShopConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| ShopError::Config(format!("Failed to read {}: {err}", path.display())))?;
        debug!(path = %path.display(), "loading shop config");
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ShopError::Config(format!(
                "currency must be a 3-letter ISO code, got '{}'",
                self.currency
            )));
        }
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(ShopError::Config(format!(
                "tax_rate must be in [0, 1), got {}",
                self.tax_rate
            )));
        }
        if self.min_password_length == 0 {
            return Err(ShopError::Config("min_password_length must be at least 1".into()));
        }
        if self.payment_limit.is_nan() || self.payment_limit <= 0.0 || self.payment_limit > MAX_AMOUNT {
            return Err(ShopError::Config(format!(
                "payment_limit must be in (0, {MAX_AMOUNT}], got {}",
                self.payment_limit
            )));
        }
        if self.default_loan_days == 0 {
            return Err(ShopError::Config("default_loan_days must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Context {
    pub config: ShopConfig,
    ids: IdGenerator,
}

impl Context {
    pub fn new(config: ShopConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
        }
    }

    pub fn next_id(&mut self) -> EntryId {
        self.ids.next_id()
    }

    pub fn issued_ids(&self) -> u64 {
        self.ids.issued()
    }
}
