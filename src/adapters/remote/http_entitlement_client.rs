//! reqwest implementation of the `EntitlementRemote` port.
//!
//! Talks to `GET /api/premium/status` and `POST /api/premium/redeem-code`
//! with the signed-in user's bearer token.
//!
//! | Response | Maps to |
//! |----------|---------|
//! | connect error, timeout, 5xx | `Unreachable` |
//! | 401 | `Unauthenticated` |
//! | 4xx with `{code}` body | the matching `EntitlementError` |
//!
//! Rejections of a redeemed code are rebuilt around the code this client
//! submitted, not the server's rendered message.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::http::premium::dto::{
    ErrorResponse, PremiumStatusResponse, RedeemCodeRequest, RedeemCodeResponse,
};
use crate::config::ClientConfig;
use crate::domain::entitlement::{EntitlementError, EntitlementStatus, NormalizedCode};
use crate::domain::foundation::ErrorCode;
use crate::ports::{EntitlementRemote, RedeemReceipt};

const STATUS_PATH: &str = "/api/premium/status";
const REDEEM_PATH: &str = "/api/premium/redeem-code";

/// Entitlement server client for one signed-in user.
pub struct HttpEntitlementClient {
    base_url: String,
    access_token: SecretString,
    http_client: reqwest::Client,
}

impl HttpEntitlementClient {
    pub fn new(config: &ClientConfig, access_token: SecretString) -> Result<Self, EntitlementError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| EntitlementError::infrastructure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            access_token,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> EntitlementError {
    if e.is_timeout() {
        EntitlementError::unreachable("request timed out")
    } else {
        EntitlementError::unreachable(e.to_string())
    }
}

/// Rebuilds the server's rejection from its code.
fn reported_error(code: ErrorCode, message: String, submitted: Option<&str>) -> EntitlementError {
    match (code, submitted) {
        (
            ErrorCode::PromoCodeNotFound
            | ErrorCode::PromoCodeAlreadyRedeemed
            | ErrorCode::PromoCodeLimitReached,
            Some(raw),
        ) => {
            let shown = NormalizedCode::parse(raw)
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|_| raw.trim().to_string());
            EntitlementError::from_code(code, shown)
        }
        (ErrorCode::InvalidPromoCode | ErrorCode::ValidationFailed, Some(raw)) => {
            match NormalizedCode::parse(raw) {
                Err(e) => e.into(),
                Ok(code) => EntitlementError::invalid_code(format!("'{}'", code)),
            }
        }
        (ErrorCode::Unauthorized, _) => EntitlementError::Unauthenticated,
        _ => EntitlementError::infrastructure(format!("{}: {}", code, message)),
    }
}

/// Turns a non-success response into the error the server reported.
async fn error_from_response(
    response: reqwest::Response,
    submitted: Option<&str>,
) -> EntitlementError {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return EntitlementError::Unauthenticated;
    }
    if status.is_server_error() {
        tracing::warn!(status = %status, "Entitlement server error");
        return EntitlementError::unreachable(format!("server returned {}", status));
    }

    match response.json::<ErrorResponse>().await {
        Ok(body) => match ErrorCode::parse(&body.code) {
            Some(code) => reported_error(code, body.error, submitted),
            None => EntitlementError::infrastructure(format!("{}: {}", body.code, body.error)),
        },
        Err(e) => EntitlementError::infrastructure(format!(
            "Unexpected {} response from entitlement server: {}",
            status, e
        )),
    }
}

#[async_trait]
impl EntitlementRemote for HttpEntitlementClient {
    async fn fetch_status(&self) -> Result<EntitlementStatus, EntitlementError> {
        let response = self
            .http_client
            .get(self.url(STATUS_PATH))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, None).await);
        }

        let body: PremiumStatusResponse = response.json().await.map_err(|e| {
            EntitlementError::infrastructure(format!("Failed to parse status response: {}", e))
        })?;

        Ok(body.into_status())
    }

    async fn redeem(&self, code: &str) -> Result<RedeemReceipt, EntitlementError> {
        let response = self
            .http_client
            .post(self.url(REDEEM_PATH))
            .bearer_auth(self.access_token.expose_secret())
            .json(&RedeemCodeRequest {
                code: Some(code.to_string()),
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, Some(code)).await);
        }

        let body: RedeemCodeResponse = response.json().await.map_err(|e| {
            EntitlementError::infrastructure(format!("Failed to parse redeem response: {}", e))
        })?;

        Ok(RedeemReceipt {
            message: body.message,
            expires_at: body.expires_at,
            days_remaining: body.days_remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpEntitlementClient {
        let mut config = ClientConfig::new(base_url);
        config.request_timeout_secs = 1;
        HttpEntitlementClient::new(&config, SecretString::new("token".to_string())).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = client("https://api.easybudget.io/");
        assert_eq!(client.url(STATUS_PATH), "https://api.easybudget.io/api/premium/status");
    }

    #[test]
    fn rejection_names_the_submitted_code_once() {
        let err = reported_error(
            ErrorCode::PromoCodeAlreadyRedeemed,
            "Promo code 'EASY2' has already been redeemed".to_string(),
            Some(" easy2 "),
        );

        assert_eq!(err, EntitlementError::already_redeemed("EASY2"));
        assert_eq!(err.to_string(), "Promo code 'EASY2' has already been redeemed");
    }

    #[test]
    fn malformed_submission_reports_local_reason() {
        let err = reported_error(
            ErrorCode::InvalidPromoCode,
            "Invalid promo code: anything".to_string(),
            Some("   "),
        );

        assert!(matches!(err, EntitlementError::InvalidCode(_)));
        assert!(!err.to_string().contains("Invalid promo code: Invalid promo code"));
    }

    #[test]
    fn unknown_rejection_keeps_server_text() {
        let err = reported_error(
            ErrorCode::AccountNotFound,
            "Account not found: bob".to_string(),
            None,
        );

        assert!(matches!(err, EntitlementError::Infrastructure(_)));
        assert!(err.to_string().contains("Account not found: bob"));
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable() {
        // Port 9 (discard) on loopback is not expected to accept connections.
        let client = client("http://127.0.0.1:9");

        let err = client.fetch_status().await.unwrap_err();

        assert!(matches!(err, EntitlementError::Unreachable(_)));
    }
}
