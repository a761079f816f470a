//! GetPremiumStatusHandler - Query handler that evaluates a user's entitlement.

use std::sync::Arc;

use crate::domain::entitlement::{
    evaluate, EntitlementError, EntitlementFacts, EntitlementStatus, PremiumGrant, TrialPolicy,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AccountRepository, GrantReader};

#[derive(Debug, Clone)]
pub struct GetPremiumStatusQuery {
    pub user_id: UserId,
    /// Account creation time as reported by the auth provider.
    pub account_created_at: Timestamp,
}

/// Evaluated status plus the grants currently conferring access.
#[derive(Debug, Clone)]
pub struct GetPremiumStatusResult {
    pub status: EntitlementStatus,
    pub active_grants: Vec<PremiumGrant>,
    pub evaluated_at: Timestamp,
}

/// Loads ledger grants and account facts, then runs the evaluator.
///
/// The trial window runs from the auth provider's account creation time,
/// so losing or deleting the account row never restarts it.
pub struct GetPremiumStatusHandler {
    accounts: Arc<dyn AccountRepository>,
    grants: Arc<dyn GrantReader>,
    trial_policy: TrialPolicy,
}

impl GetPremiumStatusHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        grants: Arc<dyn GrantReader>,
        trial_policy: TrialPolicy,
    ) -> Self {
        Self {
            accounts,
            grants,
            trial_policy,
        }
    }

    pub async fn handle(
        &self,
        query: GetPremiumStatusQuery,
    ) -> Result<GetPremiumStatusResult, EntitlementError> {
        self.handle_at(query, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        query: GetPremiumStatusQuery,
        now: Timestamp,
    ) -> Result<GetPremiumStatusResult, EntitlementError> {
        let account = self
            .accounts
            .find_or_create(&query.user_id, query.account_created_at)
            .await?;
        let grants = self.grants.grants_for_user(&query.user_id).await?;
        let has_history = self.grants.has_history(&query.user_id).await?;

        let facts = EntitlementFacts {
            is_admin: account.is_admin,
            trial: self.trial_policy.status(account.created_at, has_history, now),
            grants,
        };
        let status = evaluate(&facts, now);

        tracing::debug!(
            user_id = %query.user_id,
            source = status.source.as_str(),
            is_premium = status.is_premium,
            "Evaluated entitlement"
        );

        let active_grants = facts.grants.into_iter().filter(|g| g.covers(now)).collect();

        Ok(GetPremiumStatusResult {
            status,
            active_grants,
            evaluated_at: now,
        })
    }
}
