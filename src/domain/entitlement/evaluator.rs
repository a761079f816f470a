//! The entitlement evaluator.
//!
//! [`evaluate`] is the only place premium access is decided. The server runs
//! it over ledger facts; the client only applies expiry and staleness to a
//! result the server already produced.
//!
//! # Precedence
//!
//! | Step | Condition | Source |
//! |------|-----------|--------|
//! | 1 | `is_admin` | `admin` |
//! | 2 | any active grant without expiry | `lifetime_code` |
//! | 3 | latest active expiry is after `now` | `subscription` |
//! | 4 | trial eligible with days left | `trial` |
//! | 5 | otherwise | `none` |

use serde::{Deserialize, Serialize};

use super::{PremiumGrant, TrialStatus};
use crate::domain::foundation::Timestamp;

/// Which rule produced a premium decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementSource {
    Admin,
    LifetimeCode,
    Trial,
    Subscription,
    None,
}

impl EntitlementSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementSource::Admin => "admin",
            EntitlementSource::LifetimeCode => "lifetime_code",
            EntitlementSource::Trial => "trial",
            EntitlementSource::Subscription => "subscription",
            EntitlementSource::None => "none",
        }
    }
}

/// Result of evaluating a user's entitlement facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementStatus {
    pub is_premium: bool,
    pub is_lifetime: bool,
    pub expires_at: Option<Timestamp>,
    pub days_remaining: Option<i64>,
    pub source: EntitlementSource,
}

impl EntitlementStatus {
    /// Not premium.
    pub fn none() -> Self {
        Self {
            is_premium: false,
            is_lifetime: false,
            expires_at: None,
            days_remaining: None,
            source: EntitlementSource::None,
        }
    }

    fn lifetime(source: EntitlementSource) -> Self {
        Self {
            is_premium: true,
            is_lifetime: true,
            expires_at: None,
            days_remaining: None,
            source,
        }
    }

    /// Premium and not past `expires_at`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.is_premium && self.expires_at.map_or(true, |exp| exp.is_after(&now))
    }
}

/// Everything the evaluator needs to know about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementFacts {
    pub is_admin: bool,
    /// Grants on record. Non-active grants are ignored.
    pub grants: Vec<PremiumGrant>,
    pub trial: TrialStatus,
}

/// Merges entitlement facts into a single status.
pub fn evaluate(facts: &EntitlementFacts, now: Timestamp) -> EntitlementStatus {
    if facts.is_admin {
        return EntitlementStatus::lifetime(EntitlementSource::Admin);
    }

    let active = facts.grants.iter().filter(|g| g.is_active());

    // Null expiry is permanent regardless of provider.
    if active.clone().any(|g| g.expires_at.is_none()) {
        return EntitlementStatus::lifetime(EntitlementSource::LifetimeCode);
    }

    if let Some(latest) = active.filter_map(|g| g.expires_at).max() {
        if latest.is_after(&now) {
            return EntitlementStatus {
                is_premium: true,
                is_lifetime: false,
                expires_at: Some(latest),
                days_remaining: Some(now.ceil_days_until(&latest)),
                source: EntitlementSource::Subscription,
            };
        }
    }

    if facts.trial.eligible && facts.trial.days_remaining > 0 {
        return EntitlementStatus {
            is_premium: true,
            is_lifetime: false,
            expires_at: Some(now.add_days(facts.trial.days_remaining)),
            days_remaining: Some(facts.trial.days_remaining),
            source: EntitlementSource::Trial,
        };
    }

    EntitlementStatus::none()
}
