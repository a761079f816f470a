//! Remote entitlement service port (client side).
//!
//! The client never decides premium on its own. It asks the server through
//! this port and caches what comes back.

use async_trait::async_trait;

use crate::domain::entitlement::{EntitlementError, EntitlementStatus};
use crate::domain::foundation::Timestamp;

/// Server confirmation of a successful redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemReceipt {
    pub message: String,
    /// `None` for lifetime codes.
    pub expires_at: Option<Timestamp>,
    pub days_remaining: Option<i64>,
}

/// The entitlement server as seen from a device.
///
/// Transport failures must be reported as `EntitlementError::Unreachable`
/// so callers can fall back to the local cache.
#[async_trait]
pub trait EntitlementRemote: Send + Sync {
    /// Fetches the server-computed status for the signed-in user.
    async fn fetch_status(&self) -> Result<EntitlementStatus, EntitlementError>;

    /// Redeems a promo code on the server.
    async fn redeem(&self, code: &str) -> Result<RedeemReceipt, EntitlementError>;
}
