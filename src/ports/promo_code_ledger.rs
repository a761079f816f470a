//! Promo code ledger port.
//!
//! The ledger is the authoritative record of promo codes and who redeemed
//! what. Implementations must make [`PromoCodeLedger::redeem`] atomic:
//!
//! - **Uniqueness**: at most one redemption per (user, code), enforced by the
//!   storage engine (unique constraint), never by read-then-write
//! - **Cap**: the redemption counter is bumped by a single conditional update
//!   that fails once `current_redemptions >= max_redemptions`
//! - **All-or-nothing**: redemption row, grant row, and counter change commit
//!   together or not at all
//!
//! # Example
//!
//! ```ignore
//! let code = NormalizedCode::parse("easy2")?;
//! let redemption = ledger.redeem(&user_id, &code, Timestamp::now()).await?;
//! assert_eq!(redemption.code.as_str(), "EASY2");
//! ```

use async_trait::async_trait;

use crate::domain::entitlement::{EntitlementError, NormalizedCode, PromoCode, Redemption};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Redemption counters for one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeUsage {
    pub current_redemptions: i32,
    /// `None` means unlimited.
    pub max_redemptions: Option<i32>,
}

/// Authoritative promo code storage.
#[async_trait]
pub trait PromoCodeLedger: Send + Sync {
    /// Redeems `code` for `user_id` at `now`.
    ///
    /// On success the redemption, its premium grant, and the counter
    /// increment are all persisted.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the code does not exist or is inactive
    /// - `AlreadyRedeemed` if this user already holds a redemption of it
    /// - `LimitReached` if the global cap is exhausted
    /// - `Infrastructure` on storage failure (nothing is persisted)
    async fn redeem(
        &self,
        user_id: &UserId,
        code: &NormalizedCode,
        now: Timestamp,
    ) -> Result<Redemption, EntitlementError>;

    /// Looks up a code regardless of its active flag.
    async fn find_code(&self, code: &NormalizedCode) -> Result<Option<PromoCode>, DomainError>;

    /// Current and maximum redemption counts for a code.
    async fn usage(&self, code: &NormalizedCode) -> Result<Option<CodeUsage>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promo_code_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn PromoCodeLedger) {}
    }

    #[test]
    fn code_usage_unlimited_has_no_max() {
        let usage = CodeUsage {
            current_redemptions: 12,
            max_redemptions: None,
        };
        assert!(usage.max_redemptions.is_none());
    }
}
