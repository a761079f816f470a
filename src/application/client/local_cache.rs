//! Device-local entitlement cache.
//!
//! Mirrors the last status the server confirmed for the signed-in user so
//! the app can answer "is premium?" immediately and offline.
//!
//! # Trust rule
//!
//! Only [`ServerConfirmed`] values can be written, and only the refresher
//! can construct one. Nothing in this crate can mint premium access.
//!
//! The rule binds the Rust API, not the stored bytes. The `serverConfirmed`
//! marker is a plain JSON field, so anyone able to edit the device's
//! key-value store can forge an entry that reads back as confirmed. Such an
//! entry lasts until the next successful refresh overwrites it, and the
//! server never consults it.
//!
//! # Staleness
//!
//! An entry older than `max_age` is still returned, flagged
//! [`Freshness::Stale`]. A time-limited status whose `expires_at` has
//! passed is reported as not premium whatever its age.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entitlement::EntitlementStatus;
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{KeyValueStore, StoreError};

/// Default age after which a cached status is stale.
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const KEY_PREFIX: &str = "easy_budget.entitlement";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to serialize cache entry: {0}")]
    Serialization(String),
}

/// A status that came back from the entitlement server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfirmed {
    status: EntitlementStatus,
    computed_at: Timestamp,
}

impl ServerConfirmed {
    pub(crate) fn new(status: EntitlementStatus, computed_at: Timestamp) -> Self {
        Self {
            status,
            computed_at,
        }
    }

    pub fn status(&self) -> &EntitlementStatus {
        &self.status
    }

    pub fn computed_at(&self) -> Timestamp {
        self.computed_at
    }
}

/// Persisted cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedEntitlement {
    pub user_id: UserId,
    pub status: EntitlementStatus,
    pub computed_at: Timestamp,
    /// Set by [`LocalEntitlementCache::write`]. Not a signature.
    #[serde(default)]
    pub server_confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// Older than the max age. Gated actions should wait for a refresh.
    Stale,
}

/// A cached status after expiry and staleness have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveStatus {
    pub status: EntitlementStatus,
    pub freshness: Freshness,
    pub computed_at: Timestamp,
}

impl EffectiveStatus {
    pub fn is_premium(&self) -> bool {
        self.status.is_premium
    }

    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}

/// `true` when `computed_at` is more than `max_age` before `now`.
pub fn is_stale(computed_at: Timestamp, now: Timestamp, max_age: Duration) -> bool {
    let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    now.duration_since(&computed_at).num_seconds() > max_age_secs
}

/// Per-user cache over a [`KeyValueStore`].
pub struct LocalEntitlementCache {
    store: Arc<dyn KeyValueStore>,
    user_id: UserId,
    max_age: Duration,
}

impl LocalEntitlementCache {
    pub fn new(store: Arc<dyn KeyValueStore>, user_id: UserId) -> Self {
        Self {
            store,
            user_id,
            max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn key(&self) -> String {
        format!("{}.{}", KEY_PREFIX, self.user_id)
    }

    /// Last confirmed entry for this user, if any.
    ///
    /// Unreadable entries, entries for another user, and entries without the
    /// server marker are treated as absent.
    pub async fn read(&self) -> Result<Option<CachedEntitlement>, CacheError> {
        let Some(raw) = self.store.get(&self.key()).await? else {
            return Ok(None);
        };

        let entry: CachedEntitlement = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(user_id = %self.user_id, error = %e, "Discarding unreadable entitlement cache");
                return Ok(None);
            }
        };

        if entry.user_id != self.user_id || !entry.server_confirmed {
            tracing::warn!(user_id = %self.user_id, "Ignoring entitlement cache not confirmed for this user");
            return Ok(None);
        }

        Ok(Some(entry))
    }

    /// Last write wins.
    pub async fn write(&self, confirmed: &ServerConfirmed) -> Result<CachedEntitlement, CacheError> {
        let entry = CachedEntitlement {
            user_id: self.user_id.clone(),
            status: confirmed.status.clone(),
            computed_at: confirmed.computed_at,
            server_confirmed: true,
        };
        let json =
            serde_json::to_string(&entry).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.store.set(&self.key(), &json).await?;
        Ok(entry)
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.remove(&self.key()).await?;
        Ok(())
    }

    pub async fn is_stale(&self, now: Timestamp) -> Result<bool, CacheError> {
        Ok(self
            .read()
            .await?
            .map_or(true, |entry| is_stale(entry.computed_at, now, self.max_age)))
    }

    pub async fn effective_status(&self, now: Timestamp) -> Result<Option<EffectiveStatus>, CacheError> {
        Ok(self.read().await?.map(|entry| self.assess(&entry, now)))
    }

    /// Applies expiry and staleness to an entry.
    pub fn assess(&self, entry: &CachedEntitlement, now: Timestamp) -> EffectiveStatus {
        let status = if !entry.status.is_active_at(now) {
            EntitlementStatus::none()
        } else {
            let mut status = entry.status.clone();
            if let Some(expires_at) = status.expires_at {
                status.days_remaining = Some(now.ceil_days_until(&expires_at));
            }
            status
        };

        let freshness = if is_stale(entry.computed_at, now, self.max_age) {
            Freshness::Stale
        } else {
            Freshness::Fresh
        };

        EffectiveStatus {
            status,
            freshness,
            computed_at: entry.computed_at,
        }
    }
}
