//! Background entitlement refresh.
//!
//! ```text
//! current() ──► cached value, synchronously
//! refresh() ──► GET /api/premium/status ──► cache.write ──► watch::Sender
//!                                                             │
//!                                  subscribe() ◄──────────────┘
//! ```
//!
//! When the server is unreachable the cached value is kept and nothing is
//! published.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::local_cache::{
    CacheError, CachedEntitlement, EffectiveStatus, LocalEntitlementCache, ServerConfirmed,
};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::Timestamp;
use crate::ports::{EntitlementRemote, RedeemReceipt};

/// Keeps the local cache in step with the server and notifies subscribers.
pub struct EntitlementRefresher {
    cache: LocalEntitlementCache,
    remote: Arc<dyn EntitlementRemote>,
    sender: watch::Sender<Option<CachedEntitlement>>,
}

impl EntitlementRefresher {
    /// Seeds the watch channel from whatever the cache already holds.
    pub async fn load(
        cache: LocalEntitlementCache,
        remote: Arc<dyn EntitlementRemote>,
    ) -> Result<Self, CacheError> {
        let initial = cache.read().await?;
        let (sender, _) = watch::channel(initial);
        Ok(Self {
            cache,
            remote,
            sender,
        })
    }

    /// Last known status, with expiry and staleness applied at the current time.
    pub fn current(&self) -> Option<EffectiveStatus> {
        self.current_at(Timestamp::now())
    }

    pub fn current_at(&self, now: Timestamp) -> Option<EffectiveStatus> {
        self.sender
            .borrow()
            .as_ref()
            .map(|entry| self.cache.assess(entry, now))
    }

    /// Receives every entry the refresher publishes. `None` after sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<CachedEntitlement>> {
        self.sender.subscribe()
    }

    /// Assesses an entry received from [`subscribe`](Self::subscribe).
    pub fn assess(&self, entry: &CachedEntitlement) -> EffectiveStatus {
        self.cache.assess(entry, Timestamp::now())
    }

    /// Fetches the server status and publishes it.
    ///
    /// `Unreachable` is not an error here: the cached value is returned
    /// unchanged.
    pub async fn refresh(&self) -> Result<Option<EffectiveStatus>, EntitlementError> {
        let status = match self.remote.fetch_status().await {
            Ok(status) => status,
            Err(EntitlementError::Unreachable(reason)) => {
                tracing::warn!(
                    user_id = %self.cache.user_id(),
                    reason = %reason,
                    "Entitlement server unreachable, keeping cached status"
                );
                return Ok(self.current());
            }
            Err(e) => return Err(e),
        };

        let now = Timestamp::now();
        let confirmed = ServerConfirmed::new(status, now);
        let entry = match self.cache.write(&confirmed).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    user_id = %self.cache.user_id(),
                    error = %e,
                    "Failed to persist entitlement cache"
                );
                CachedEntitlement {
                    user_id: self.cache.user_id().clone(),
                    status: confirmed.status().clone(),
                    computed_at: now,
                    server_confirmed: true,
                }
            }
        };

        let effective = self.cache.assess(&entry, now);
        self.sender.send_replace(Some(entry));

        tracing::debug!(
            user_id = %self.cache.user_id(),
            is_premium = effective.status.is_premium,
            source = effective.status.source.as_str(),
            "Entitlement refreshed"
        );

        Ok(Some(effective))
    }

    /// Runs [`refresh`](Self::refresh) on the runtime without waiting.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let refresher = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = refresher.refresh().await {
                tracing::warn!(
                    user_id = %refresher.cache.user_id(),
                    error = %e,
                    "Background entitlement refresh failed"
                );
            }
        })
    }

    /// Redeems a code on the server, then refreshes.
    ///
    /// Always a live round trip. Errors, including `Unreachable`, are
    /// returned to the caller.
    pub async fn redeem(&self, code: &str) -> Result<RedeemReceipt, EntitlementError> {
        let receipt = self.remote.redeem(code).await?;

        if let Err(e) = self.refresh().await {
            tracing::warn!(
                user_id = %self.cache.user_id(),
                error = %e,
                "Refresh after redemption failed"
            );
        }

        Ok(receipt)
    }

    /// Forgets the cached status for this user.
    pub async fn sign_out(&self) -> Result<(), CacheError> {
        self.cache.clear().await?;
        self.sender.send_replace(None);
        Ok(())
    }
}
