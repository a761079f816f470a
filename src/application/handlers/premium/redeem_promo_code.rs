//! RedeemPromoCodeHandler - Command handler for promo code redemption.
//!
//! Every attempt, accepted or rejected, leaves one audit entry on the
//! `easy_budget::audit` target with `user_id`, `code`, and `outcome`.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, NormalizedCode, Redemption, MAX_CODE_LENGTH};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AccountRepository, PromoCodeLedger};

/// Command to redeem a promo code for the calling user.
#[derive(Debug, Clone)]
pub struct RedeemPromoCodeCommand {
    pub user_id: UserId,
    /// Account creation time as reported by the auth provider.
    pub account_created_at: Timestamp,
    /// Raw code as typed by the user.
    pub code: String,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedeemPromoCodeResult {
    pub redemption: Redemption,
    pub message: String,
    pub days_remaining: Option<i64>,
}

pub struct RedeemPromoCodeHandler {
    ledger: Arc<dyn PromoCodeLedger>,
    accounts: Arc<dyn AccountRepository>,
}

impl RedeemPromoCodeHandler {
    pub fn new(ledger: Arc<dyn PromoCodeLedger>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { ledger, accounts }
    }

    pub async fn handle(
        &self,
        cmd: RedeemPromoCodeCommand,
    ) -> Result<RedeemPromoCodeResult, EntitlementError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        cmd: RedeemPromoCodeCommand,
        now: Timestamp,
    ) -> Result<RedeemPromoCodeResult, EntitlementError> {
        let result = self.redeem(&cmd, now).await;
        audit(&cmd, &result);
        result
    }

    async fn redeem(
        &self,
        cmd: &RedeemPromoCodeCommand,
        now: Timestamp,
    ) -> Result<RedeemPromoCodeResult, EntitlementError> {
        let code = NormalizedCode::parse(&cmd.code)?;

        // Redemptions reference the account row.
        self.accounts
            .find_or_create(&cmd.user_id, cmd.account_created_at)
            .await?;

        let redemption = self.ledger.redeem(&cmd.user_id, &code, now).await?;
        let days_remaining = redemption.days_remaining(now);

        Ok(RedeemPromoCodeResult {
            message: success_message(days_remaining),
            days_remaining,
            redemption,
        })
    }
}

fn success_message(days_remaining: Option<i64>) -> String {
    match days_remaining {
        None => "Lifetime premium unlocked".to_string(),
        Some(1) => "Premium unlocked for 1 day".to_string(),
        Some(days) => format!("Premium unlocked for {} days", days),
    }
}

fn audit(cmd: &RedeemPromoCodeCommand, result: &Result<RedeemPromoCodeResult, EntitlementError>) {
    let code: String = cmd
        .code
        .trim()
        .chars()
        .take(MAX_CODE_LENGTH)
        .collect::<String>()
        .to_ascii_uppercase();

    match result {
        Ok(ok) => tracing::info!(
            target: "easy_budget::audit",
            user_id = %cmd.user_id,
            code = %code,
            outcome = "redeemed",
            redemption_id = %ok.redemption.id,
            "Promo code redeemed"
        ),
        Err(EntitlementError::Infrastructure(reason)) => tracing::error!(
            target: "easy_budget::audit",
            user_id = %cmd.user_id,
            code = %code,
            outcome = "error",
            error = %reason,
            "Promo code redemption failed"
        ),
        Err(e) => tracing::warn!(
            target: "easy_budget::audit",
            user_id = %cmd.user_id,
            code = %code,
            outcome = e.outcome(),
            "Promo code rejected"
        ),
    }
}
