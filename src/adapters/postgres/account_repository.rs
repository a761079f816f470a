//! PostgreSQL implementation of AccountRepository.
//!
//! `promo_redemptions` and `premium_grants` reference `accounts` with
//! `ON DELETE CASCADE`, so deleting the account row removes everything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entitlement::UserAccount;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    user_id: String,
    created_at: DateTime<Utc>,
    is_admin: bool,
}

impl TryFrom<AccountRow> for UserAccount {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(UserAccount {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            created_at: Timestamp::from_datetime(row.created_at),
            is_admin: row.is_admin,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_or_create(
        &self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<UserAccount, DomainError> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (user_id, created_at, is_admin)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (user_id) DO UPDATE
                SET created_at = LEAST(accounts.created_at, EXCLUDED.created_at)
            RETURNING user_id, created_at, is_admin
            "#,
        )
        .bind(user_id.as_str())
        .bind(created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to provision account: {}", e)))?;

        row.try_into()
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT user_id, created_at, is_admin FROM accounts WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load account: {}", e)))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
