//! Account repository port.
//!
//! Accounts mirror the facts the entitlement engine needs from the auth
//! system: when the account was created and whether it is an operator.
//! Deleting an account removes its redemptions and grants with it.

use async_trait::async_trait;

use crate::domain::entitlement::UserAccount;
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Persistence for account facts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Returns the account, provisioning it with the auth provider's
    /// `created_at` if it does not exist yet.
    ///
    /// A stored `created_at` only ever moves earlier: a value later than the
    /// one supplied is replaced, an earlier one is kept. Re-provisioning a
    /// deleted account therefore lands on the original signup time.
    async fn find_or_create(
        &self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<UserAccount, DomainError>;

    /// Returns the account if it exists.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Deletes the account and everything that references it.
    ///
    /// Returns false if there was nothing to delete.
    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError>;
}
