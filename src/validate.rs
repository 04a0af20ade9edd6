//! Field validators shared by every variant constructor.
//!
//! Each validator returns `Ok(())` or a [`ShopError::Validation`] naming the
//! offending field, so constructors can either bail with `?` or feed the
//! result into [`crate::error::ValidationErrors`].

use crate::error::{Result, ShopError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("invalid email pattern");
}

/// Largest money value any variant accepts. Keeps cent rounding and running
/// totals finite.
pub const MAX_AMOUNT: f64 = 1e12;

pub const MAX_WEIGHT_KG: f64 = 100_000.0;

pub fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShopError::validation(field, format!("must be positive, got {value}")))
    }
}

pub fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShopError::validation(field, format!("must not be negative, got {value}")))
    }
}

fn within_cap(field: &str, value: f64) -> Result<()> {
    if value <= MAX_AMOUNT {
        Ok(())
    } else {
        Err(ShopError::validation(field, format!("must not exceed {MAX_AMOUNT}, got {value}")))
    }
}

/// Strictly positive money value, capped at [`MAX_AMOUNT`].
pub fn amount(field: &str, value: f64) -> Result<()> {
    positive(field, value)?;
    within_cap(field, value)
}

/// Money value that may be zero, capped at [`MAX_AMOUNT`].
pub fn balance(field: &str, value: f64) -> Result<()> {
    non_negative(field, value)?;
    within_cap(field, value)
}

pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ShopError::validation(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ))
    }
}

pub fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ShopError::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}

pub fn email(field: &str, value: &str) -> Result<()> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ShopError::validation(field, format!("'{value}' is not a valid email address")))
    }
}

pub fn min_length(field: &str, value: &str, min: usize) -> Result<()> {
    let len = value.chars().count();
    if len >= min {
        Ok(())
    } else {
        Err(ShopError::validation(
            field,
            format!("must be at least {min} characters, got {len}"),
        ))
    }
}

/// Accepts strings made only of ASCII digits whose length lies in `min..=max`.
pub fn digits(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ShopError::validation(field, "must contain digits only"));
    }
    in_range(field, value.len(), min, max)
}
