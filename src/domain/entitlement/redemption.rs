//! Redemption record: one user's use of one promo code.

use serde::{Deserialize, Serialize};

use super::NormalizedCode;
use crate::domain::foundation::{PromoCodeId, RedemptionId, Timestamp, UserId};

/// Append-only record. At most one exists per (user, code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub id: RedemptionId,
    pub user_id: UserId,
    pub promo_code_id: PromoCodeId,
    pub code: NormalizedCode,
    pub redeemed_at: Timestamp,
    /// `None` for lifetime codes.
    pub expires_at: Option<Timestamp>,
}

impl Redemption {
    pub fn is_lifetime(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Whole days left on this redemption, rounded up. `None` for lifetime.
    pub fn days_remaining(&self, now: Timestamp) -> Option<i64> {
        self.expires_at.map(|exp| now.ceil_days_until(&exp))
    }
}
