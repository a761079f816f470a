//! Assembles the full HTTP application.
//!
//! ```text
//! /health                     public
//! /api/premium/*  ─┐
//! /api/user/*     ─┴─ auth_middleware
//! ```
//!
//! Every route is wrapped in request tracing, CORS, and a request timeout.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::account::{account_routes, AccountAppState};
use super::health::health;
use super::middleware::{auth_middleware, AuthState};
use super::premium::{premium_routes, PremiumAppState};
use crate::config::ServerConfig;
use crate::domain::entitlement::TrialPolicy;
use crate::ports::{AccountRepository, GrantReader, PromoCodeLedger, SessionValidator};

/// Everything the HTTP layer needs from the outside.
#[derive(Clone)]
pub struct AppServices {
    pub ledger: Arc<dyn PromoCodeLedger>,
    pub grants: Arc<dyn GrantReader>,
    pub accounts: Arc<dyn AccountRepository>,
    pub validator: Arc<dyn SessionValidator>,
    pub trial_policy: TrialPolicy,
}

/// HTTP concerns that wrap every route.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl HttpSettings {
    pub fn from_server_config(server: &ServerConfig) -> Self {
        Self {
            request_timeout: server.request_timeout(),
            cors_origins: server.cors_origins_list(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            cors_origins: Vec::new(),
        }
    }
}

pub fn build_router(services: AppServices, settings: &HttpSettings) -> Router {
    let premium_state = PremiumAppState {
        ledger: services.ledger,
        grants: services.grants,
        accounts: services.accounts.clone(),
        trial_policy: services.trial_policy,
    };
    let account_state = AccountAppState {
        accounts: services.accounts,
    };
    let auth_state: AuthState = services.validator;

    let api = Router::new()
        .nest("/api/premium", premium_routes().with_state(premium_state))
        .nest("/api/user", account_routes().with_state(account_state))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
