//! DeleteAccountHandler - Command handler for account deletion.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct DeleteAccountCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct DeleteAccountResult {
    pub deleted_user_id: UserId,
}

/// Deletes the account row; redemptions and grants go with it.
pub struct DeleteAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl DeleteAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(
        &self,
        cmd: DeleteAccountCommand,
    ) -> Result<DeleteAccountResult, EntitlementError> {
        if !self.accounts.delete(&cmd.user_id).await? {
            return Err(EntitlementError::AccountNotFound(cmd.user_id.to_string()));
        }

        tracing::info!(user_id = %cmd.user_id, "Account deleted");

        Ok(DeleteAccountResult {
            deleted_user_id: cmd.user_id,
        })
    }
}
