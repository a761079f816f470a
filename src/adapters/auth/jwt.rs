//! HS256 JWT validator for the hosted auth backend.
//!
//! The backend signs access tokens with a shared secret. Validation checks
//! signature, `iss`, `aud`, and `exp`; `sub` becomes the [`UserId`].
//!
//! The backend also stamps `created_at` (Unix seconds) with the account's
//! creation time. Tokens without it are rejected: the trial window is
//! measured from that claim and nothing else.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::SessionValidator;

#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
}

/// Validates bearer tokens signed with the backend's shared secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        tracing::warn!(error = %e, "Token issued for a different service");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            },
        )?;

        let user_id = UserId::new(data.claims.sub).map_err(|_| {
            tracing::warn!("Token has empty subject");
            AuthError::InvalidToken
        })?;

        let created_at = data.claims.created_at.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token has no created_at claim");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            data.claims.email.unwrap_or_default(),
            Timestamp::from_unix_secs(created_at),
        ))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("iss", &self.validation.iss)
            .field("aud", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use secrecy::SecretString;
    use serde::Serialize;

    const SECRET: &str = "unit-test-secret-unit-test-secret-0123";
    const ISSUER: &str = "https://auth.easybudget.io/auth/v1";

    const SIGNED_UP: i64 = 1_700_000_000;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        email: &'a str,
        iss: &'a str,
        aud: &'a str,
        exp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<i64>,
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(SECRET.to_string()),
            issuer: ISSUER.to_string(),
            audience: "authenticated".to_string(),
        }
    }

    fn token(secret: &str, iss: &str, aud: &str, exp_offset_secs: i64) -> String {
        sign(
            secret,
            &TestClaims {
                sub: "7f9c2d1e-user",
                email: "saver@example.com",
                iss,
                aud,
                exp: chrono::Utc::now().timestamp() + exp_offset_secs,
                created_at: Some(SIGNED_UP),
            },
        )
    }

    fn sign(secret: &str, claims: &TestClaims<'_>) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let validator = JwtSessionValidator::new(&config());
        let user = validator
            .validate(&token(SECRET, ISSUER, "authenticated", 3600))
            .await
            .unwrap();
        assert_eq!(user.id.as_str(), "7f9c2d1e-user");
        assert_eq!(user.email, "saver@example.com");
        assert_eq!(user.created_at, Timestamp::from_unix_secs(SIGNED_UP));
    }

    #[tokio::test]
    async fn token_without_created_at_is_invalid() {
        let validator = JwtSessionValidator::new(&config());
        let unanchored = sign(
            SECRET,
            &TestClaims {
                sub: "7f9c2d1e-user",
                email: "saver@example.com",
                iss: ISSUER,
                aud: "authenticated",
                exp: chrono::Utc::now().timestamp() + 3600,
                created_at: None,
            },
        );

        assert_eq!(validator.validate(&unanchored).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let validator = JwtSessionValidator::new(&config());
        let result = validator
            .validate(&token(SECRET, ISSUER, "authenticated", -3600))
            .await;
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let validator = JwtSessionValidator::new(&config());
        let result = validator
            .validate(&token("another-secret-another-secret-9999", ISSUER, "authenticated", 3600))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let validator = JwtSessionValidator::new(&config());
        let result = validator.validate(&token(SECRET, ISSUER, "anon", 3600)).await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid() {
        let validator = JwtSessionValidator::new(&config());
        let result = validator
            .validate(&token(SECRET, "https://evil.example.com", "authenticated", 3600))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let validator = JwtSessionValidator::new(&config());
        assert_eq!(validator.validate("not.a.jwt").await, Err(AuthError::InvalidToken));
    }
}
