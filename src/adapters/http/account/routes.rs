//! Axum router for account endpoints.

use axum::{routing::delete, Router};

use super::handlers::{delete_account, AccountAppState};

/// Routes mounted at `/api/user`.
///
/// - `DELETE /account` - Delete the caller's account and premium history
pub fn account_routes() -> Router<AccountAppState> {
    Router::new().route("/account", delete(delete_account))
}
