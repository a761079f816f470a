//! Account facts mirrored from the auth system.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// The facts the entitlement engine needs about a user.
///
/// `created_at` is immutable once provisioned. `is_admin` is set by
/// operators directly in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub is_admin: bool,
}

impl UserAccount {
    pub fn new(user_id: UserId, created_at: Timestamp) -> Self {
        Self {
            user_id,
            created_at,
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Account age at `now`. A `created_at` in the future counts as zero.
    pub fn age_at(&self, now: Timestamp) -> Duration {
        now.duration_since(&self.created_at).max(Duration::zero())
    }
}
