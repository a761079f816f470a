//! Premium grants (subscription records).
//!
//! A grant is any record that confers premium for a period: a store
//! subscription, a promo code redemption, or a manual operator grant.
//! Status transitions happen outside this service; the entitlement engine
//! only reads grants.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Redemption;
use crate::domain::foundation::{GrantId, RedemptionId, Timestamp, UserId};

/// Whether a grant renews on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    OneTime,
    Recurring,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::OneTime => "one_time",
            GrantType::Recurring => "recurring",
        }
    }

    /// Parses the stored form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "one_time" => Some(GrantType::OneTime),
            "recurring" => Some(GrantType::Recurring),
            _ => None,
        }
    }
}

/// Who issued the grant.
///
/// Unknown provider names are preserved as `Other` so new billing backends
/// do not break status reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GrantProvider {
    Store,
    Promo,
    Other(String),
}

impl GrantProvider {
    pub fn as_str(&self) -> &str {
        match self {
            GrantProvider::Store => "store",
            GrantProvider::Promo => "promo",
            GrantProvider::Other(name) => name,
        }
    }
}

impl From<String> for GrantProvider {
    fn from(value: String) -> Self {
        match value.as_str() {
            "store" => GrantProvider::Store,
            "promo" => GrantProvider::Promo,
            _ => GrantProvider::Other(value),
        }
    }
}

impl From<GrantProvider> for String {
    fn from(value: GrantProvider) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GrantProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    Active,
    Expired,
    Cancelled,
}

impl GrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantStatus::Active => "active",
            GrantStatus::Expired => "expired",
            GrantStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GrantStatus::Active),
            "expired" => Some(GrantStatus::Expired),
            "cancelled" => Some(GrantStatus::Cancelled),
            _ => None,
        }
    }
}

/// A record conferring premium access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumGrant {
    pub id: GrantId,
    pub user_id: UserId,
    pub grant_type: GrantType,
    pub provider: GrantProvider,
    pub status: GrantStatus,
    /// `None` means lifetime.
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    /// Set for grants created by promo code redemption.
    pub redemption_id: Option<RedemptionId>,
}

impl PremiumGrant {
    /// Builds the grant that accompanies a successful redemption.
    pub fn from_redemption(redemption: &Redemption) -> Self {
        Self {
            id: GrantId::new(),
            user_id: redemption.user_id.clone(),
            grant_type: GrantType::OneTime,
            provider: GrantProvider::Promo,
            status: GrantStatus::Active,
            expires_at: redemption.expires_at,
            created_at: redemption.redeemed_at,
            redemption_id: Some(redemption.id),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GrantStatus::Active
    }

    pub fn is_lifetime(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Whole days left, rounded up. `None` for lifetime grants.
    pub fn days_remaining(&self, now: Timestamp) -> Option<i64> {
        self.expires_at.map(|exp| now.ceil_days_until(&exp))
    }

    /// Active and either lifetime or not yet past expiry.
    pub fn covers(&self, now: Timestamp) -> bool {
        self.is_active() && self.expires_at.map_or(true, |exp| exp.is_after(&now))
    }
}
