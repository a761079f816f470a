//! PostgreSQL implementation of GrantReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{GrantProvider, GrantStatus, GrantType, PremiumGrant};
use crate::domain::foundation::{DomainError, ErrorCode, GrantId, RedemptionId, Timestamp, UserId};
use crate::ports::GrantReader;

pub struct PostgresGrantReader {
    pool: PgPool,
}

impl PostgresGrantReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a premium grant.
#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    id: Uuid,
    user_id: String,
    grant_type: String,
    provider: String,
    status: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    redemption_id: Option<Uuid>,
}

impl TryFrom<GrantRow> for PremiumGrant {
    type Error = DomainError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let grant_type = GrantType::parse(&row.grant_type).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid grant_type value: {}", row.grant_type),
            )
        })?;
        let status = GrantStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;

        Ok(PremiumGrant {
            id: GrantId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            grant_type,
            provider: GrantProvider::from(row.provider),
            status,
            expires_at: row.expires_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            redemption_id: row.redemption_id.map(RedemptionId::from_uuid),
        })
    }
}

#[async_trait]
impl GrantReader for PostgresGrantReader {
    async fn grants_for_user(&self, user_id: &UserId) -> Result<Vec<PremiumGrant>, DomainError> {
        let rows: Vec<GrantRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, grant_type, provider, status, expires_at, created_at, redemption_id
            FROM premium_grants
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load grants: {}", e)))?;

        rows.into_iter().map(PremiumGrant::try_from).collect()
    }

    async fn has_history(&self, user_id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM promo_redemptions WHERE user_id = $1)
                OR EXISTS (SELECT 1 FROM premium_grants WHERE user_id = $1)
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check grant history: {}", e)))
    }
}
