//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};

use crate::adapters::http::error::EntitlementApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::account::{DeleteAccountCommand, DeleteAccountHandler};
use crate::ports::AccountRepository;

use super::dto::DeleteAccountResponse;

#[derive(Clone)]
pub struct AccountAppState {
    pub accounts: Arc<dyn AccountRepository>,
}

/// DELETE /api/user/account
pub async fn delete_account(
    State(state): State<AccountAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DeleteAccountResponse>, EntitlementApiError> {
    let result = DeleteAccountHandler::new(state.accounts.clone())
        .handle(DeleteAccountCommand { user_id: user.id })
        .await?;

    Ok(Json(DeleteAccountResponse {
        message: "Account and all premium data deleted".to_string(),
        deleted_user_id: result.deleted_user_id.to_string(),
    }))
}
