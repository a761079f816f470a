//! In-memory entitlement store.
//!
//! Implements the ledger, grant reader, and account repository over one
//! shared state. Every redemption runs entirely inside a single lock, giving
//! the same uniqueness and cap guarantees as the PostgreSQL adapter.
//!
//! Used for tests and the local development server.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entitlement::{
    EntitlementError, NormalizedCode, PremiumGrant, PromoCode, Redemption, UserAccount,
};
use crate::domain::foundation::{DomainError, ErrorCode, RedemptionId, Timestamp, UserId};
use crate::ports::{AccountRepository, CodeUsage, GrantReader, PromoCodeLedger};

#[derive(Debug, Default)]
struct State {
    codes: HashMap<NormalizedCode, PromoCode>,
    redemptions: Vec<Redemption>,
    grants: Vec<PremiumGrant>,
    accounts: HashMap<UserId, UserAccount>,
}

/// Shared in-memory state behind all three server ports.
#[derive(Debug, Default)]
pub struct InMemoryEntitlementStore {
    state: Mutex<State>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the product's promo codes.
    pub fn seeded() -> Self {
        let now = Timestamp::now();
        let mut store = Self::new();
        for promo in seed_codes(now) {
            store = store.with_code(promo);
        }
        store
    }

    /// Adds or replaces a promo code.
    pub fn with_code(self, promo: PromoCode) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.codes.insert(promo.code.clone(), promo);
        }
        self
    }

    /// Records a grant issued outside redemption (store purchase, operator).
    pub fn insert_grant(&self, grant: PremiumGrant) -> Result<(), DomainError> {
        self.lock()?.grants.push(grant);
        Ok(())
    }

    /// Inserts or replaces account facts.
    pub fn upsert_account(&self, account: UserAccount) -> Result<(), DomainError> {
        self.lock()?.accounts.insert(account.user_id.clone(), account);
        Ok(())
    }

    /// Number of redemptions on record, across all codes.
    pub fn redemption_count(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.redemptions.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "entitlement store lock poisoned"))
    }
}

/// `EASY2` (30 days, unlimited) and `EASYLIFE` (lifetime, 100 uses).
pub fn seed_codes(now: Timestamp) -> Vec<PromoCode> {
    let mut codes = Vec::new();
    if let Ok(easy2) = NormalizedCode::parse("EASY2") {
        codes.push(PromoCode::new(easy2, Some(30), None, now).with_description("30 days of premium"));
    }
    if let Ok(life) = NormalizedCode::parse("EASYLIFE") {
        codes.push(PromoCode::new(life, None, Some(100), now).with_description("Lifetime premium"));
    }
    codes
}

#[async_trait]
impl PromoCodeLedger for InMemoryEntitlementStore {
    async fn redeem(
        &self,
        user_id: &UserId,
        code: &NormalizedCode,
        now: Timestamp,
    ) -> Result<Redemption, EntitlementError> {
        let mut state = self.lock()?;

        let promo = match state.codes.get(code) {
            Some(p) if p.active => p.clone(),
            _ => return Err(EntitlementError::not_found(code.as_str())),
        };

        let already = state
            .redemptions
            .iter()
            .any(|r| r.user_id == *user_id && r.promo_code_id == promo.id);
        if already {
            return Err(EntitlementError::already_redeemed(code.as_str()));
        }

        if !promo.has_capacity() {
            return Err(EntitlementError::limit_reached(code.as_str()));
        }

        let redemption = Redemption {
            id: RedemptionId::new(),
            user_id: user_id.clone(),
            promo_code_id: promo.id,
            code: code.clone(),
            redeemed_at: now,
            expires_at: promo.expiry_from(now),
        };
        let grant = PremiumGrant::from_redemption(&redemption);

        if let Some(stored) = state.codes.get_mut(code) {
            stored.current_redemptions += 1;
        }
        state.redemptions.push(redemption.clone());
        state.grants.push(grant);

        Ok(redemption)
    }

    async fn find_code(&self, code: &NormalizedCode) -> Result<Option<PromoCode>, DomainError> {
        Ok(self.lock()?.codes.get(code).cloned())
    }

    async fn usage(&self, code: &NormalizedCode) -> Result<Option<CodeUsage>, DomainError> {
        Ok(self.lock()?.codes.get(code).map(|p| CodeUsage {
            current_redemptions: p.current_redemptions,
            max_redemptions: p.max_redemptions,
        }))
    }
}

#[async_trait]
impl GrantReader for InMemoryEntitlementStore {
    async fn grants_for_user(&self, user_id: &UserId) -> Result<Vec<PremiumGrant>, DomainError> {
        Ok(self
            .lock()?
            .grants
            .iter()
            .filter(|g| g.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn has_history(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let state = self.lock()?;
        Ok(state.redemptions.iter().any(|r| r.user_id == *user_id)
            || state.grants.iter().any(|g| g.user_id == *user_id))
    }
}

#[async_trait]
impl AccountRepository for InMemoryEntitlementStore {
    async fn find_or_create(
        &self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<UserAccount, DomainError> {
        let mut state = self.lock()?;
        let account = state
            .accounts
            .entry(user_id.clone())
            .or_insert_with(|| UserAccount::new(user_id.clone(), created_at));
        if created_at.is_before(&account.created_at) {
            account.created_at = created_at;
        }
        Ok(account.clone())
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.lock()?.accounts.get(user_id).cloned())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let existed = state.accounts.remove(user_id).is_some();
        state.redemptions.retain(|r| r.user_id != *user_id);
        state.grants.retain(|g| g.user_id != *user_id);
        Ok(existed)
    }
}
