//! Seeded promo code records.
//!
//! A promo code is created by administrative seeding and only ever mutated by
//! redemption, which increments `current_redemptions` by exactly one.

use serde::{Deserialize, Serialize};

use super::NormalizedCode;
use crate::domain::foundation::{PromoCodeId, Timestamp};

/// A promo code as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: PromoCodeId,
    pub code: NormalizedCode,
    pub description: Option<String>,
    /// Days of premium granted per redemption. `None` means lifetime.
    pub duration_days: Option<i32>,
    /// Global cap on redemptions. `None` means unlimited.
    pub max_redemptions: Option<i32>,
    pub current_redemptions: i32,
    /// Inactive codes behave as if they did not exist.
    pub active: bool,
    pub created_at: Timestamp,
}

impl PromoCode {
    /// Creates an active, unredeemed code.
    pub fn new(
        code: NormalizedCode,
        duration_days: Option<i32>,
        max_redemptions: Option<i32>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: PromoCodeId::new(),
            code,
            description: None,
            duration_days,
            max_redemptions,
            current_redemptions: 0,
            active: true,
            created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Returns true if each redemption grants permanent premium.
    pub fn is_lifetime(&self) -> bool {
        self.duration_days.is_none()
    }

    /// Returns true if another redemption fits under the cap.
    pub fn has_capacity(&self) -> bool {
        match self.max_redemptions {
            Some(max) => self.current_redemptions < max,
            None => true,
        }
    }

    /// Remaining redemptions, or `None` when unlimited.
    pub fn remaining(&self) -> Option<i32> {
        self.max_redemptions
            .map(|max| (max - self.current_redemptions).max(0))
    }

    /// Expiry of a grant redeemed at `redeemed_at`. `None` for lifetime codes.
    pub fn expiry_from(&self, redeemed_at: Timestamp) -> Option<Timestamp> {
        self.duration_days
            .map(|days| redeemed_at.add_days(i64::from(days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> NormalizedCode {
        NormalizedCode::parse(s).unwrap()
    }

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    #[test]
    fn unlimited_code_always_has_capacity() {
        let mut promo = PromoCode::new(code("EASY2"), Some(30), None, t0());
        promo.current_redemptions = 1_000_000;
        assert!(promo.has_capacity());
        assert_eq!(promo.remaining(), None);
    }

    #[test]
    fn capped_code_exhausts_at_max() {
        let mut promo = PromoCode::new(code("EASYLIFE"), None, Some(2), t0());
        assert!(promo.has_capacity());
        promo.current_redemptions = 2;
        assert!(!promo.has_capacity());
        assert_eq!(promo.remaining(), Some(0));
    }

    #[test]
    fn expiry_adds_duration_days() {
        let promo = PromoCode::new(code("EASY2"), Some(30), None, t0());
        assert_eq!(promo.expiry_from(t0()), Some(t0().add_days(30)));
        assert!(!promo.is_lifetime());
    }

    #[test]
    fn lifetime_code_has_no_expiry() {
        let promo = PromoCode::new(code("EASYLIFE"), None, Some(100), t0());
        assert!(promo.is_lifetime());
        assert_eq!(promo.expiry_from(t0()), None);
    }

    #[test]
    fn new_code_is_active_and_unredeemed() {
        let promo = PromoCode::new(code("X1"), Some(7), None, t0()).with_description("launch");
        assert!(promo.active);
        assert_eq!(promo.current_redemptions, 0);
        assert_eq!(promo.description.as_deref(), Some("launch"));
        assert!(!promo.deactivated().active);
    }
}
