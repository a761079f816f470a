//! Axum router for premium endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_premium_status, redeem_code, PremiumAppState};

/// Routes mounted at `/api/premium`.
///
/// - `GET /status` - Evaluated entitlement for the caller
/// - `POST /redeem-code` - Redeem a promo code
pub fn premium_routes() -> Router<PremiumAppState> {
    Router::new()
        .route("/status", get(get_premium_status))
        .route("/redeem-code", post(redeem_code))
}
