//! Entitlement error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidCode | 400 |
//! | AlreadyRedeemed | 400 |
//! | LimitReached | 400 |
//! | NotFound | 404 |
//! | AccountNotFound | 404 |
//! | Unauthenticated | 401 |
//! | Unreachable | 503 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// `DomainError` detail key carrying the variant payload across conversions.
const SUBJECT_DETAIL: &str = "subject";

/// Errors surfaced by redemption and status operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    /// Unknown or inactive promo code.
    #[error("Promo code '{0}' not found")]
    NotFound(String),

    /// This user already redeemed this code.
    #[error("Promo code '{0}' has already been redeemed")]
    AlreadyRedeemed(String),

    /// The code's global redemption cap has been reached.
    #[error("Promo code '{0}' has reached its redemption limit")]
    LimitReached(String),

    /// Empty or malformed code string.
    #[error("Invalid promo code: {0}")]
    InvalidCode(String),

    #[error("Authentication required")]
    Unauthenticated,

    /// The entitlement server could not be reached.
    #[error("Entitlement service unreachable: {0}")]
    Unreachable(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Internal error: {0}")]
    Infrastructure(String),
}

impl EntitlementError {
    pub fn not_found(code: impl Into<String>) -> Self {
        EntitlementError::NotFound(code.into())
    }

    pub fn already_redeemed(code: impl Into<String>) -> Self {
        EntitlementError::AlreadyRedeemed(code.into())
    }

    pub fn limit_reached(code: impl Into<String>) -> Self {
        EntitlementError::LimitReached(code.into())
    }

    pub fn invalid_code(reason: impl Into<String>) -> Self {
        EntitlementError::InvalidCode(reason.into())
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        EntitlementError::Unreachable(reason.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Builds the variant for `code` around its payload.
    ///
    /// `subject` is the promo code, reason or account id the variant names,
    /// never a rendered message.
    pub fn from_code(code: ErrorCode, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        match code {
            ErrorCode::PromoCodeNotFound => EntitlementError::NotFound(subject),
            ErrorCode::PromoCodeAlreadyRedeemed => EntitlementError::AlreadyRedeemed(subject),
            ErrorCode::PromoCodeLimitReached => EntitlementError::LimitReached(subject),
            ErrorCode::InvalidPromoCode | ErrorCode::ValidationFailed => {
                EntitlementError::InvalidCode(subject)
            }
            ErrorCode::AccountNotFound => EntitlementError::AccountNotFound(subject),
            ErrorCode::Unauthorized => EntitlementError::Unauthenticated,
            ErrorCode::ServiceUnavailable => EntitlementError::Unreachable(subject),
            _ => EntitlementError::Infrastructure(subject),
        }
    }

    /// The payload the variant was built from, if it carries one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            EntitlementError::NotFound(s)
            | EntitlementError::AlreadyRedeemed(s)
            | EntitlementError::LimitReached(s)
            | EntitlementError::InvalidCode(s)
            | EntitlementError::Unreachable(s)
            | EntitlementError::AccountNotFound(s)
            | EntitlementError::Infrastructure(s) => Some(s),
            EntitlementError::Unauthenticated => None,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::NotFound(_) => ErrorCode::PromoCodeNotFound,
            EntitlementError::AlreadyRedeemed(_) => ErrorCode::PromoCodeAlreadyRedeemed,
            EntitlementError::LimitReached(_) => ErrorCode::PromoCodeLimitReached,
            EntitlementError::InvalidCode(_) => ErrorCode::InvalidPromoCode,
            EntitlementError::Unauthenticated => ErrorCode::Unauthorized,
            EntitlementError::Unreachable(_) => ErrorCode::ServiceUnavailable,
            EntitlementError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            EntitlementError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Short outcome label used in audit entries.
    pub fn outcome(&self) -> &'static str {
        match self {
            EntitlementError::NotFound(_) => "not_found",
            EntitlementError::AlreadyRedeemed(_) => "already_redeemed",
            EntitlementError::LimitReached(_) => "limit_reached",
            EntitlementError::InvalidCode(_) => "invalid_code",
            EntitlementError::Unauthenticated => "unauthenticated",
            EntitlementError::Unreachable(_) => "unreachable",
            EntitlementError::AccountNotFound(_) => "account_not_found",
            EntitlementError::Infrastructure(_) => "error",
        }
    }

    /// Terminal errors are user-visible and never retried.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EntitlementError::NotFound(_)
                | EntitlementError::AlreadyRedeemed(_)
                | EntitlementError::LimitReached(_)
                | EntitlementError::InvalidCode(_)
        )
    }

    /// Returns true if the caller may recover by retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EntitlementError::Unreachable(_) | EntitlementError::Infrastructure(_)
        )
    }
}

impl From<ValidationError> for EntitlementError {
    fn from(err: ValidationError) -> Self {
        EntitlementError::InvalidCode(err.to_string())
    }
}

/// Prefers the carried subject so a round trip does not nest messages.
impl From<DomainError> for EntitlementError {
    fn from(mut err: DomainError) -> Self {
        match err.details.remove(SUBJECT_DETAIL) {
            Some(subject) => EntitlementError::from_code(err.code, subject),
            None => match EntitlementError::from_code(err.code, err.message.clone()) {
                EntitlementError::Infrastructure(_) => {
                    EntitlementError::Infrastructure(err.to_string())
                }
                other => other,
            },
        }
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err.subject() {
            Some(subject) => domain.with_detail(SUBJECT_DETAIL, subject),
            None => domain,
        }
    }
}
