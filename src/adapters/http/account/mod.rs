//! HTTP adapter for account endpoints.
//!
//! - `DELETE /api/user/account` - Delete the caller's account

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::DeleteAccountResponse;
pub use handlers::AccountAppState;
pub use routes::account_routes;
