use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShopError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShopError {
    #[error("Invalid value for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("No entry found for key {key}")]
    NotFound { key: String },

    #[error("Cannot take from an empty {what}")]
    Empty { what: String },

    #[error("Insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("{method} payment declined: {reason}")]
    PaymentDeclined { method: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(key: impl ToString) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn empty(what: impl Into<String>) -> Self {
        Self::Empty { what: what.into() }
    }

    pub fn declined(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PaymentDeclined {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ShopError {
    fn from(err: toml::de::Error) -> Self {
        ShopError::Config(err.to_string())
    }
}

// =============================================================================
// Error accumulation for multi-field construction
// =============================================================================

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ShopError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ShopError) {
        self.errors.push(error);
    }

    /// Records the error of a failed check, if any.
    pub fn check(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.add(err);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Vec<ShopError>> {
        if self.has_errors() {
            Err(self.errors)
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ShopError::validation("price", "must be positive");
        assert_eq!(err.to_string(), "Invalid value for field 'price': must be positive");

        let err = ShopError::not_found(42);
        assert_eq!(err.to_string(), "No entry found for key 42");

        let err = ShopError::InsufficientFunds {
            requested: 150.0,
            available: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 150.00, available 100.00"
        );
    }

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        errors.check(Ok(()));
        errors.check(Err(ShopError::validation("email", "malformed")));
        errors.add(ShopError::validation("age", "out of range"));

        assert_eq!(errors.count(), 2);
        let result = errors.into_result("user");
        assert_eq!(result.unwrap_err().len(), 2);
    }

    #[test]
    fn test_validation_errors_empty_is_ok() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.into_result(7), Ok(7));
    }

    #[test]
    fn test_from_toml_error() {
        let err: ShopError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, ShopError::Config(_)));
    }
}
