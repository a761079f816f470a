//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidPromoCode,

    // Not found errors
    PromoCodeNotFound,
    AccountNotFound,

    // Redemption errors
    PromoCodeAlreadyRedeemed,
    PromoCodeLimitReached,

    // Authorization errors
    Unauthorized,

    // Infrastructure errors
    ServiceUnavailable,
    DatabaseError,
    CacheError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidPromoCode => "INVALID_PROMO_CODE",
            ErrorCode::PromoCodeNotFound => "PROMO_CODE_NOT_FOUND",
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::PromoCodeAlreadyRedeemed => "PROMO_CODE_ALREADY_REDEEMED",
            ErrorCode::PromoCodeLimitReached => "PROMO_CODE_LIMIT_REACHED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

impl ErrorCode {
    /// Parses the wire form produced by `Display`.
    pub fn parse(s: &str) -> Option<Self> {
        let code = match s {
            "VALIDATION_FAILED" => ErrorCode::ValidationFailed,
            "INVALID_PROMO_CODE" => ErrorCode::InvalidPromoCode,
            "PROMO_CODE_NOT_FOUND" => ErrorCode::PromoCodeNotFound,
            "ACCOUNT_NOT_FOUND" => ErrorCode::AccountNotFound,
            "PROMO_CODE_ALREADY_REDEEMED" => ErrorCode::PromoCodeAlreadyRedeemed,
            "PROMO_CODE_LIMIT_REACHED" => ErrorCode::PromoCodeLimitReached,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "SERVICE_UNAVAILABLE" => ErrorCode::ServiceUnavailable,
            "DATABASE_ERROR" => ErrorCode::DatabaseError,
            "CACHE_ERROR" => ErrorCode::CacheError,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            _ => return None,
        };
        Some(code)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error with the given context.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("code");
        assert_eq!(format!("{}", err), "Field 'code' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("code_length", 1, 64, 80);
        assert_eq!(
            format!("{}", err),
            "Field 'code_length' must be between 1 and 64, got 80"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::PromoCodeNotFound, "Promo code not found");
        assert_eq!(format!("{}", err), "[PROMO_CODE_NOT_FOUND] Promo code not found");
    }

    #[test]
    fn error_code_parses_its_display_form() {
        for code in [
            ErrorCode::PromoCodeNotFound,
            ErrorCode::PromoCodeLimitReached,
            ErrorCode::Unauthorized,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::parse(&code.to_string()), Some(code));
        }
        assert_eq!(ErrorCode::parse("AUTH_ERROR"), None);
    }

    #[test]
    fn domain_error_validation_records_field() {
        let err = DomainError::validation("user_id", "must be a UUID");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"user_id".to_string()));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(
            format!("{}", ErrorCode::PromoCodeLimitReached),
            "PROMO_CODE_LIMIT_REACHED"
        );
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}
