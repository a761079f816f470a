//! HTTP adapter for premium endpoints.
//!
//! - `GET /api/premium/status` - Evaluated entitlement for the caller
//! - `POST /api/premium/redeem-code` - Redeem a promo code

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::PremiumAppState;
pub use routes::premium_routes;
