//! Request validation errors.

use thiserror::Error;

/// A request body or query string failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields required at creation are missing or empty.
    #[error("Required fields are: description, priority, mode, deviceid")]
    MissingRequiredFields,

    /// An updatable field was supplied without a usable value.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A field was supplied with a value of the wrong shape.
    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }
}

/// Result type for request validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::EmptyField("mode").to_string(),
            "mode cannot be empty"
        );
        assert_eq!(
            ValidationError::invalid("deviceId", "an integer").to_string(),
            "deviceId must be an integer"
        );
    }
}
