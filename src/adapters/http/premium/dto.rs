//! HTTP DTOs for premium endpoints.
//!
//! The camelCase field names are the wire contract shared with the app.
//! Both directions derive serde so the device client decodes the same types
//! the server encodes.

use serde::{Deserialize, Serialize};

use crate::application::handlers::premium::{GetPremiumStatusResult, RedeemPromoCodeResult};
use crate::domain::entitlement::{EntitlementSource, EntitlementStatus, PremiumGrant};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/premium/redeem-code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedeemCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatusResponse {
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    pub is_lifetime: bool,
    pub source: EntitlementSource,
    #[serde(default)]
    pub active_subscriptions: Vec<GrantDto>,
}

impl PremiumStatusResponse {
    pub fn from_result(result: &GetPremiumStatusResult) -> Self {
        let status = &result.status;
        Self {
            is_premium: status.is_premium,
            expires_at: status.expires_at,
            days_remaining: status.days_remaining,
            is_lifetime: status.is_lifetime,
            source: status.source,
            active_subscriptions: result
                .active_grants
                .iter()
                .map(|g| GrantDto::from_grant(g, result.evaluated_at))
                .collect(),
        }
    }

    pub fn into_status(self) -> EntitlementStatus {
        EntitlementStatus {
            is_premium: self.is_premium,
            is_lifetime: self.is_lifetime,
            expires_at: self.expires_at,
            days_remaining: self.days_remaining,
            source: self.source,
        }
    }
}

/// One entry of `activeSubscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantDto {
    pub id: String,
    #[serde(rename = "type")]
    pub grant_type: String,
    pub provider: String,
    pub expires_at: Option<Timestamp>,
    pub days_remaining: Option<i64>,
    pub status: String,
}

impl GrantDto {
    pub fn from_grant(grant: &PremiumGrant, now: Timestamp) -> Self {
        Self {
            id: grant.id.to_string(),
            grant_type: grant.grant_type.as_str().to_string(),
            provider: grant.provider.as_str().to_string(),
            expires_at: grant.expires_at,
            days_remaining: grant.days_remaining(now),
            status: grant.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeResponse {
    pub success: bool,
    pub message: String,
    /// `null` for lifetime codes.
    pub expires_at: Option<Timestamp>,
    pub days_remaining: Option<i64>,
}

impl From<RedeemPromoCodeResult> for RedeemCodeResponse {
    fn from(result: RedeemPromoCodeResult) -> Self {
        Self {
            success: true,
            message: result.message,
            expires_at: result.redemption.expires_at,
            days_remaining: result.days_remaining,
        }
    }
}

/// Error body for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine code, e.g. `PROMO_CODE_NOT_FOUND`.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{GrantProvider, GrantStatus, GrantType};
    use crate::domain::foundation::{GrantId, UserId};

    #[test]
    fn status_response_uses_camel_case_and_omits_missing_expiry() {
        let response = PremiumStatusResponse {
            is_premium: true,
            expires_at: None,
            days_remaining: None,
            is_lifetime: true,
            source: EntitlementSource::LifetimeCode,
            active_subscriptions: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isPremium"], true);
        assert_eq!(json["isLifetime"], true);
        assert_eq!(json["source"], "lifetime_code");
        assert!(json.get("expiresAt").is_none());
        assert_eq!(json["activeSubscriptions"], serde_json::json!([]));
    }

    #[test]
    fn grant_dto_serializes_type_field() {
        let now = Timestamp::now();
        let grant = PremiumGrant {
            id: GrantId::new(),
            user_id: UserId::new("u").unwrap(),
            grant_type: GrantType::OneTime,
            provider: GrantProvider::Promo,
            status: GrantStatus::Active,
            expires_at: Some(now.add_days(30)),
            created_at: now,
            redemption_id: None,
        };

        let json = serde_json::to_value(GrantDto::from_grant(&grant, now)).unwrap();

        assert_eq!(json["type"], "one_time");
        assert_eq!(json["provider"], "promo");
        assert_eq!(json["status"], "active");
        assert_eq!(json["daysRemaining"], 30);
    }

    #[test]
    fn redeem_response_keeps_null_expiry_for_lifetime() {
        let response = RedeemCodeResponse {
            success: true,
            message: "Lifetime premium unlocked".to_string(),
            expires_at: None,
            days_remaining: None,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["expiresAt"].is_null());
        assert!(json.as_object().unwrap().contains_key("expiresAt"));
    }

    #[test]
    fn redeem_request_tolerates_missing_code() {
        let request: RedeemCodeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.code, None);
    }

    #[test]
    fn status_response_round_trips_to_domain_status() {
        let json = r#"{"isPremium":false,"isLifetime":false,"source":"none"}"#;
        let response: PremiumStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_status(), EntitlementStatus::none());
    }
}
