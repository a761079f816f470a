//! End-to-end entitlement scenarios.
//!
//! Server side runs the application handlers against the in-memory store
//! with explicit clocks. Client side starts the real router on a loopback
//! port and talks to it through `HttpEntitlementClient` and
//! `EntitlementRefresher`.

use std::sync::Arc;

use secrecy::SecretString;

use easy_budget::adapters::auth::MockSessionValidator;
use easy_budget::adapters::http::{build_router, AppServices, HttpSettings};
use easy_budget::adapters::memory::InMemoryEntitlementStore;
use easy_budget::adapters::remote::HttpEntitlementClient;
use easy_budget::adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
use easy_budget::application::client::{
    EntitlementRefresher, Freshness, LocalEntitlementCache,
};
use easy_budget::application::handlers::{
    GetPremiumStatusHandler, GetPremiumStatusQuery, RedeemPromoCodeCommand, RedeemPromoCodeHandler,
};
use easy_budget::config::ClientConfig;
use easy_budget::domain::entitlement::{
    EntitlementError, EntitlementSource, EntitlementStatus, NormalizedCode, PromoCode, TrialPolicy,
};
use easy_budget::domain::foundation::{Timestamp, UserId};
use easy_budget::ports::{KeyValueStore, PromoCodeLedger};

// =============================================================================
// Server-side helpers
// =============================================================================

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

struct Server {
    store: Arc<InMemoryEntitlementStore>,
    /// Signup time the auth provider reports for every user.
    signed_up: Timestamp,
}

impl Server {
    fn new(store: InMemoryEntitlementStore) -> Self {
        Self {
            store: Arc::new(store),
            signed_up: Timestamp::now(),
        }
    }

    fn signed_up_at(mut self, signed_up: Timestamp) -> Self {
        self.signed_up = signed_up;
        self
    }

    fn redeem_handler(&self) -> RedeemPromoCodeHandler {
        RedeemPromoCodeHandler::new(self.store.clone(), self.store.clone())
    }

    fn status_handler(&self) -> GetPremiumStatusHandler {
        GetPremiumStatusHandler::new(self.store.clone(), self.store.clone(), TrialPolicy::default())
    }

    async fn redeem_at(
        &self,
        user_id: &str,
        code: &str,
        now: Timestamp,
    ) -> Result<(), EntitlementError> {
        self.redeem_handler()
            .handle_at(
                RedeemPromoCodeCommand {
                    user_id: user(user_id),
                    account_created_at: self.signed_up,
                    code: code.to_string(),
                },
                now,
            )
            .await
            .map(|_| ())
    }

    async fn status_at(&self, user_id: &str, now: Timestamp) -> EntitlementStatus {
        self.status_handler()
            .handle_at(
                GetPremiumStatusQuery {
                    user_id: user(user_id),
                    account_created_at: self.signed_up,
                },
                now,
            )
            .await
            .unwrap()
            .status
    }
}

// =============================================================================
// Server scenarios
// =============================================================================

#[tokio::test]
async fn easy2_is_thirty_days_then_nothing() {
    let server = Server::new(InMemoryEntitlementStore::seeded());
    let t0 = Timestamp::now();

    server.redeem_at("saver", "EASY2", t0).await.unwrap();

    let at_t0 = server.status_at("saver", t0).await;
    assert!(at_t0.is_premium);
    assert_eq!(at_t0.source, EntitlementSource::Subscription);
    assert_eq!(at_t0.expires_at, Some(t0.add_days(30)));
    assert_eq!(at_t0.days_remaining, Some(30));

    let after = server.status_at("saver", t0.add_days(31)).await;
    assert!(!after.is_premium);
    assert_eq!(after.source, EntitlementSource::None);
}

#[tokio::test]
async fn ten_day_old_account_loses_trial_after_redemption() {
    let now = Timestamp::now();
    let one_day = PromoCode::new(NormalizedCode::parse("ONEDAY").unwrap(), Some(1), None, now);
    let server = Server::new(InMemoryEntitlementStore::seeded().with_code(one_day))
        .signed_up_at(now.minus_days(10));

    let trial = server.status_at("saver", now).await;
    assert_eq!(trial.source, EntitlementSource::Trial);
    assert_eq!(trial.days_remaining, Some(4));

    server.redeem_at("saver", "ONEDAY", now).await.unwrap();

    let day_eleven = server.status_at("saver", now.add_days(1)).await;
    assert!(!day_eleven.is_premium);
    assert_eq!(day_eleven.source, EntitlementSource::None);
}

#[tokio::test]
async fn notreal_is_not_found_and_changes_nothing() {
    let server = Server::new(InMemoryEntitlementStore::seeded());

    let err = server
        .redeem_at("saver", "NOTREAL", Timestamp::now())
        .await
        .unwrap_err();

    assert!(matches!(err, EntitlementError::NotFound(_)));
    assert_eq!(server.store.redemption_count().unwrap(), 0);
    let usage = server
        .store
        .usage(&NormalizedCode::parse("EASY2").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(usage.current_redemptions, 0);
}

#[tokio::test]
async fn concurrent_redemptions_respect_the_cap() {
    const CAP: i32 = 5;
    const EXTRA: usize = 7;

    let capped = PromoCode::new(
        NormalizedCode::parse("LAUNCH").unwrap(),
        Some(30),
        Some(CAP),
        Timestamp::now(),
    );
    let server = Arc::new(Server::new(InMemoryEntitlementStore::new().with_code(capped)));

    let attempts = (0..CAP as usize + EXTRA).map(|i| {
        let server = server.clone();
        tokio::spawn(async move {
            server
                .redeem_at(&format!("user-{}", i), "LAUNCH", Timestamp::now())
                .await
        })
    });
    let results = futures::future::join_all(attempts).await;

    let successes = results.iter().filter(|r| matches!(r, Ok(Ok(())))).count();
    let limited = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(EntitlementError::LimitReached(_)))))
        .count();
    assert_eq!(successes, CAP as usize);
    assert_eq!(limited, EXTRA);

    let usage = server
        .store
        .usage(&NormalizedCode::parse("LAUNCH").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(usage.current_redemptions, CAP);
}

#[tokio::test]
async fn concurrent_double_redemption_succeeds_once() {
    let server = Arc::new(Server::new(InMemoryEntitlementStore::seeded()));

    let attempts = (0..4).map(|_| {
        let server = server.clone();
        tokio::spawn(async move { server.redeem_at("saver", "EASY2", Timestamp::now()).await })
    });
    let results = futures::future::join_all(attempts).await;

    let successes = results.iter().filter(|r| matches!(r, Ok(Ok(())))).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(EntitlementError::AlreadyRedeemed(_)))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 3);
}

// =============================================================================
// Client scenarios (real HTTP on loopback)
// =============================================================================

/// Binds the router on an ephemeral port and returns its base URL.
async fn spawn_server(store: Arc<InMemoryEntitlementStore>) -> String {
    let validator = MockSessionValidator::new()
        .with_test_user("token-saver", "saver")
        .with_test_user("token-other", "other");
    let services = AppServices {
        ledger: store.clone(),
        grants: store.clone(),
        accounts: store,
        validator: Arc::new(validator),
        trial_policy: TrialPolicy::default(),
    };
    let app = build_router(services, &HttpSettings::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL on which nothing is listening.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn client(base_url: &str, token: &str) -> Arc<HttpEntitlementClient> {
    let mut config = ClientConfig::new(base_url);
    config.request_timeout_secs = 2;
    Arc::new(HttpEntitlementClient::new(&config, SecretString::new(token.to_string())).unwrap())
}

#[tokio::test]
async fn client_sees_trial_then_lifetime_after_redeem() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let cache = LocalEntitlementCache::new(device, user("saver"));
    let refresher = EntitlementRefresher::load(cache, client(&base, "token-saver"))
        .await
        .unwrap();

    let trial = refresher.refresh().await.unwrap().unwrap();
    assert!(trial.is_premium());
    assert_eq!(trial.status.source, EntitlementSource::Trial);

    let receipt = refresher.redeem("easylife").await.unwrap();
    assert_eq!(receipt.expires_at, None);

    let current = refresher.current().unwrap();
    assert!(current.status.is_lifetime);
    assert_eq!(current.status.source, EntitlementSource::LifetimeCode);
    assert_eq!(current.freshness, Freshness::Fresh);
}

#[tokio::test]
async fn client_maps_server_rejections() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let refresher = EntitlementRefresher::load(
        LocalEntitlementCache::new(device, user("saver")),
        client(&base, "token-saver"),
    )
    .await
    .unwrap();

    assert!(matches!(
        refresher.redeem("NOTREAL").await,
        Err(EntitlementError::NotFound(_))
    ));
    refresher.redeem("EASY2").await.unwrap();
    assert!(matches!(
        refresher.redeem("EASY2").await,
        Err(EntitlementError::AlreadyRedeemed(_))
    ));
    assert!(matches!(
        refresher.redeem("   ").await,
        Err(EntitlementError::InvalidCode(_))
    ));
}

#[tokio::test]
async fn client_rejection_messages_name_the_code_once() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let refresher = EntitlementRefresher::load(
        LocalEntitlementCache::new(device, user("saver")),
        client(&base, "token-saver"),
    )
    .await
    .unwrap();

    let missing = refresher.redeem("notreal").await.unwrap_err();
    refresher.redeem("EASY2").await.unwrap();
    let repeated = refresher.redeem("EASY2").await.unwrap_err();

    assert_eq!(missing.to_string(), "Promo code 'NOTREAL' not found");
    assert_eq!(repeated.to_string(), "Promo code 'EASY2' has already been redeemed");
}

#[tokio::test]
async fn client_with_bad_token_is_unauthenticated() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let refresher = EntitlementRefresher::load(
        LocalEntitlementCache::new(device, user("saver")),
        client(&base, "token-forged"),
    )
    .await
    .unwrap();

    assert_eq!(refresher.refresh().await, Err(EntitlementError::Unauthenticated));
}

#[tokio::test]
async fn offline_device_keeps_last_confirmed_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.json");
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;

    {
        let device: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&path));
        let online = EntitlementRefresher::load(
            LocalEntitlementCache::new(device, user("saver")),
            client(&base, "token-saver"),
        )
        .await
        .unwrap();
        online.redeem("EASYLIFE").await.unwrap();
    }

    let device: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&path));
    let offline = EntitlementRefresher::load(
        LocalEntitlementCache::new(device, user("saver")),
        client(&dead_url().await, "token-saver"),
    )
    .await
    .unwrap();

    let kept = offline.refresh().await.unwrap().unwrap();
    assert!(kept.is_premium());
    assert!(kept.status.is_lifetime);
}

#[tokio::test]
async fn cache_is_per_user_on_a_shared_device() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());

    let saver = EntitlementRefresher::load(
        LocalEntitlementCache::new(device.clone(), user("saver")),
        client(&base, "token-saver"),
    )
    .await
    .unwrap();
    saver.redeem("EASYLIFE").await.unwrap();

    let other = EntitlementRefresher::load(
        LocalEntitlementCache::new(device, user("other")),
        client(&dead_url().await, "token-other"),
    )
    .await
    .unwrap();

    assert!(other.current().is_none());
    assert_eq!(other.refresh().await, Ok(None));
}

#[tokio::test]
async fn sign_out_forgets_cached_status() {
    let base = spawn_server(Arc::new(InMemoryEntitlementStore::seeded())).await;
    let device: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let refresher = EntitlementRefresher::load(
        LocalEntitlementCache::new(device.clone(), user("saver")),
        client(&base, "token-saver"),
    )
    .await
    .unwrap();
    refresher.refresh().await.unwrap();
    let mut updates = refresher.subscribe();

    refresher.sign_out().await.unwrap();

    updates.changed().await.unwrap();
    assert!(updates.borrow().is_none());
    let reloaded = LocalEntitlementCache::new(device, user("saver"));
    assert!(reloaded.read().await.unwrap().is_none());
}
