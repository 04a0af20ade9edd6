//! Contracts every variant family implements.
//!
//! A variant that leaves out a required operation does not compile, so an
//! incomplete implementation can never reach a registry:
//!
//! ```compile_fail
//! use shopfloor::contract::{Shape, Variant};
//!
//! #[derive(Debug, serde::Serialize)]
//! struct Blob;
//!
//! impl Variant for Blob {
//!     fn kind(&self) -> &'static str { "Blob" }
//! }
//!
//! // `perimeter` is missing.
//! impl Shape for Blob {
//!     fn area(&self) -> f64 { 1.0 }
//! }
//! ```

use crate::error::{Result, ShopError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use uuid::Uuid;

/// Explicit serialization of a variant's state.
///
/// Blanket-implemented for every `Serialize` type, and object safe, so a
/// `dyn Shape` can still be snapshotted.
pub trait Snapshot {
    fn snapshot(&self) -> Result<Value>;
}

impl<T: Serialize> Snapshot for T {
    fn snapshot(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(ShopError::from)
    }
}

/// Common supertrait of all contracts.
pub trait Variant: Snapshot + Debug {
    /// Concrete type name, fixed for the variant's lifetime.
    fn kind(&self) -> &'static str;

    fn label(&self) -> String {
        self.kind().to_string()
    }
}

pub trait Shape: Variant {
    fn area(&self) -> f64;
    fn perimeter(&self) -> f64;
}

pub trait Product: Variant {
    fn name(&self) -> &str;
    fn sku(&self) -> &str;
    fn base_price(&self) -> f64;
    /// Price after the variant's own discount and surcharges, in cents precision.
    fn final_price(&self) -> f64;
    fn apply_discount(&mut self, percent: f64) -> Result<()>;
}

pub trait Payment: Variant {
    fn method(&self) -> &'static str;
    fn fee(&self, amount: f64) -> f64;
    fn process(&mut self, amount: f64) -> Result<Receipt>;
}

pub trait Account: Variant {
    fn holder(&self) -> &str;
    fn balance(&self) -> f64;
    fn deposit(&mut self, amount: f64) -> Result<f64>;
    fn withdraw(&mut self, amount: f64) -> Result<f64>;
}

pub trait LibraryItem: Variant {
    fn title(&self) -> &str;
    fn loan_days(&self) -> u32;
    fn daily_late_fee(&self) -> f64;

    fn late_fee(&self, days_late: u32) -> f64 {
        round_cents(self.daily_late_fee() * days_late as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: Uuid,
    pub method: String,
    pub amount: f64,
    pub fee: f64,
    pub total: f64,
}

impl Receipt {
    pub fn new(method: &str, amount: f64, fee: f64) -> Self {
        let amount = round_cents(amount);
        let fee = round_cents(fee);
        Self {
            transaction_id: Uuid::new_v4(),
            method: method.to_string(),
            amount,
            fee,
            total: round_cents(amount + fee),
        }
    }
}

/// Rounds to two decimals. Values too large to scale by 100 are returned as is.
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Unit {
        side: f64,
    }

    impl Variant for Unit {
        fn kind(&self) -> &'static str {
            "Unit"
        }
    }

    impl Shape for Unit {
        fn area(&self) -> f64 {
            self.side * self.side
        }

        fn perimeter(&self) -> f64 {
            4.0 * self.side
        }
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(78.539816), 78.54);
        assert_eq!(round_cents(0.005), 0.01);
        assert_eq!(round_cents(10.0), 10.0);
    }

    #[test]
    fn test_round_cents_stays_finite_for_large_values() {
        assert_eq!(round_cents(1e307), 1e307);
        assert_eq!(round_cents(f64::MAX), f64::MAX);
        assert_eq!(round_cents(-1e307), -1e307);
    }

    #[test]
    fn test_snapshot_through_trait_object() {
        let shape: Box<dyn Shape> = Box::new(Unit { side: 2.0 });
        let value = shape.snapshot().unwrap();
        assert_eq!(value["side"], 2.0);
        assert_eq!(shape.label(), "Unit");
    }

    #[test]
    fn test_receipt_totals() {
        let receipt = Receipt::new("Card", 100.0, 2.9);
        assert_eq!(receipt.total, 102.9);
        assert_eq!(receipt.method, "Card");

        let other = Receipt::new("Card", 100.0, 2.9);
        assert_ne!(receipt.transaction_id, other.transaction_id);
    }
}
