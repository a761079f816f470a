//! Grant reader port (read side).
//!
//! The entitlement engine never writes grants except through redemption;
//! store subscriptions and operator grants arrive from outside.

use async_trait::async_trait;

use crate::domain::entitlement::PremiumGrant;
use crate::domain::foundation::{DomainError, UserId};

/// Read access to a user's premium grants and entitlement history.
#[async_trait]
pub trait GrantReader: Send + Sync {
    /// All grants on record for the user, in any status.
    async fn grants_for_user(&self, user_id: &UserId) -> Result<Vec<PremiumGrant>, DomainError>;

    /// True if the user has ever had a redemption or a grant.
    ///
    /// Any history permanently disqualifies the account from the trial.
    async fn has_history(&self, user_id: &UserId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn GrantReader) {}
    }
}
