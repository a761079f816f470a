//! HTTP handlers for premium endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::adapters::http::error::EntitlementApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::premium::{
    GetPremiumStatusHandler, GetPremiumStatusQuery, RedeemPromoCodeCommand, RedeemPromoCodeHandler,
};
use crate::domain::entitlement::TrialPolicy;
use crate::ports::{AccountRepository, GrantReader, PromoCodeLedger};

use super::dto::{PremiumStatusResponse, RedeemCodeRequest, RedeemCodeResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PremiumAppState {
    pub ledger: Arc<dyn PromoCodeLedger>,
    pub grants: Arc<dyn GrantReader>,
    pub accounts: Arc<dyn AccountRepository>,
    pub trial_policy: TrialPolicy,
}

impl PremiumAppState {
    pub fn status_handler(&self) -> GetPremiumStatusHandler {
        GetPremiumStatusHandler::new(self.accounts.clone(), self.grants.clone(), self.trial_policy)
    }

    pub fn redeem_handler(&self) -> RedeemPromoCodeHandler {
        RedeemPromoCodeHandler::new(self.ledger.clone(), self.accounts.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/premium/status
pub async fn get_premium_status(
    State(state): State<PremiumAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<PremiumStatusResponse>, EntitlementApiError> {
    let result = state
        .status_handler()
        .handle(GetPremiumStatusQuery {
            user_id: user.id,
            account_created_at: user.created_at,
        })
        .await?;

    Ok(Json(PremiumStatusResponse::from_result(&result)))
}

/// POST /api/premium/redeem-code
///
/// A missing or unparseable body is treated as an empty code so the attempt
/// is still audited and rejected with 400.
pub async fn redeem_code(
    State(state): State<PremiumAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<RedeemCodeRequest>, JsonRejection>,
) -> Result<Json<RedeemCodeResponse>, EntitlementApiError> {
    let code = body.ok().and_then(|Json(req)| req.code).unwrap_or_default();

    let result = state
        .redeem_handler()
        .handle(RedeemPromoCodeCommand {
            user_id: user.id,
            account_created_at: user.created_at,
            code,
        })
        .await?;

    Ok(Json(RedeemCodeResponse::from(result)))
}
