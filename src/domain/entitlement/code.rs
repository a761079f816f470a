//! Promo code string normalization.
//!
//! Codes are case-insensitive. The canonical form is trimmed and upper-cased,
//! limited to ASCII alphanumerics plus `-` and `_`.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted code length after trimming.
pub const MAX_CODE_LENGTH: usize = 64;

/// A promo code string in canonical form, ready for ledger lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    /// Trims and upper-cases user input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is empty after trimming, longer
    /// than [`MAX_CODE_LENGTH`], or contains characters outside
    /// `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        if trimmed.len() > MAX_CODE_LENGTH {
            return Err(ValidationError::out_of_range(
                "code_length",
                1,
                MAX_CODE_LENGTH as i32,
                trimmed.len().min(i32::MAX as usize) as i32,
            ));
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ValidationError::invalid_format(
                "code",
                format!("unexpected character '{}'", bad),
            ));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NormalizedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
