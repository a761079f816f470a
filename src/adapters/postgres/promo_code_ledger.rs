//! PostgreSQL implementation of PromoCodeLedger.
//!
//! Redemption runs in one transaction:
//!
//! 1. Look up the active code
//! 2. `INSERT ... ON CONFLICT (user_id, promo_code_id) DO NOTHING RETURNING id`;
//!    no row back means the user already redeemed it
//! 3. Conditional `UPDATE ... SET current_redemptions = current_redemptions + 1
//!    WHERE current_redemptions < max_redemptions`; no row back means the
//!    cap is exhausted
//! 4. Insert the promo grant
//!
//! Any early return drops the transaction, which rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{
    EntitlementError, NormalizedCode, PremiumGrant, PromoCode, Redemption,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, PromoCodeId, RedemptionId, Timestamp, UserId,
};
use crate::ports::{CodeUsage, PromoCodeLedger};

/// PostgreSQL-backed promo code ledger.
pub struct PostgresPromoCodeLedger {
    pool: PgPool,
}

impl PostgresPromoCodeLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a promo code.
#[derive(Debug, sqlx::FromRow)]
struct PromoCodeRow {
    id: Uuid,
    code: String,
    description: Option<String>,
    duration_days: Option<i32>,
    max_redemptions: Option<i32>,
    current_redemptions: i32,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PromoCodeRow> for PromoCode {
    type Error = DomainError;

    fn try_from(row: PromoCodeRow) -> Result<Self, Self::Error> {
        let code = NormalizedCode::parse(&row.code).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored code: {}", e))
        })?;

        Ok(PromoCode {
            id: PromoCodeId::from_uuid(row.id),
            code,
            description: row.description,
            duration_days: row.duration_days,
            max_redemptions: row.max_redemptions,
            current_redemptions: row.current_redemptions,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_CODE: &str = r#"
    SELECT id, code, description, duration_days, max_redemptions,
           current_redemptions, active, created_at
    FROM promo_codes
    WHERE code = $1
"#;

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

#[async_trait]
impl PromoCodeLedger for PostgresPromoCodeLedger {
    async fn redeem(
        &self,
        user_id: &UserId,
        code: &NormalizedCode,
        now: Timestamp,
    ) -> Result<Redemption, EntitlementError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin redemption", e))?;

        let row: Option<PromoCodeRow> = sqlx::query_as(SELECT_CODE)
            .bind(code.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to load promo code", e))?;

        let promo: PromoCode = match row {
            Some(row) if row.active => row.try_into()?,
            _ => return Err(EntitlementError::not_found(code.as_str())),
        };

        let redemption = Redemption {
            id: RedemptionId::new(),
            user_id: user_id.clone(),
            promo_code_id: promo.id,
            code: code.clone(),
            redeemed_at: now,
            expires_at: promo.expiry_from(now),
        };

        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO promo_redemptions (id, user_id, promo_code_id, redeemed_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, promo_code_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(redemption.id.as_uuid())
        .bind(user_id.as_str())
        .bind(promo.id.as_uuid())
        .bind(now.as_datetime())
        .bind(redemption.expires_at.map(|t| *t.as_datetime()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to record redemption", e))?;

        if inserted.is_none() {
            return Err(EntitlementError::already_redeemed(code.as_str()));
        }

        let bumped: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE promo_codes
            SET current_redemptions = current_redemptions + 1
            WHERE id = $1
              AND (max_redemptions IS NULL OR current_redemptions < max_redemptions)
            RETURNING current_redemptions
            "#,
        )
        .bind(promo.id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to increment redemptions", e))?;

        if bumped.is_none() {
            return Err(EntitlementError::limit_reached(code.as_str()));
        }

        let grant = PremiumGrant::from_redemption(&redemption);
        insert_grant(&mut tx, &grant).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit redemption", e))?;

        Ok(redemption)
    }

    async fn find_code(&self, code: &NormalizedCode) -> Result<Option<PromoCode>, DomainError> {
        let row: Option<PromoCodeRow> = sqlx::query_as(SELECT_CODE)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load promo code", e))?;

        row.map(PromoCode::try_from).transpose()
    }

    async fn usage(&self, code: &NormalizedCode) -> Result<Option<CodeUsage>, DomainError> {
        let row: Option<(i32, Option<i32>)> = sqlx::query_as(
            "SELECT current_redemptions, max_redemptions FROM promo_codes WHERE code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load promo code usage", e))?;

        Ok(row.map(|(current_redemptions, max_redemptions)| CodeUsage {
            current_redemptions,
            max_redemptions,
        }))
    }
}

async fn insert_grant(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    grant: &PremiumGrant,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO premium_grants (
            id, user_id, grant_type, provider, status, expires_at, created_at, redemption_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(grant.id.as_uuid())
    .bind(grant.user_id.as_str())
    .bind(grant.grant_type.as_str())
    .bind(grant.provider.as_str())
    .bind(grant.status.as_str())
    .bind(grant.expires_at.map(|t| *t.as_datetime()))
    .bind(grant.created_at.as_datetime())
    .bind(grant.redemption_id.map(|id| *id.as_uuid()))
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to insert premium grant", e))?;

    Ok(())
}
