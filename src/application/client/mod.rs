//! Device-side entitlement client.
//!
//! The app embeds these to answer "is premium?" without blocking on the
//! network. All decisions come from the server; the device only applies
//! expiry and staleness to what it was told.

mod local_cache;
mod refresher;

pub use local_cache::{
    is_stale, CacheError, CachedEntitlement, EffectiveStatus, Freshness, LocalEntitlementCache,
    ServerConfirmed, DEFAULT_CACHE_MAX_AGE,
};
pub use refresher::EntitlementRefresher;
