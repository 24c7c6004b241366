//! OTP code repository
//!
//! Issuing a code retires every outstanding code for the address in
//! the same transaction, so the newest code is the only verifiable
//! one and its attempt counter is the single limiter.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::DbError;

/// Stored OTP code
#[derive(Debug, Clone, FromRow)]
pub struct OtpRecord {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub attempts: i32,
    pub consumed: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// OTP code repository
pub struct OtpRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> OtpRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh code, retiring any outstanding codes for the email.
    pub async fn issue(&self, email: &str, code: &str, ttl: Duration) -> Result<OtpRecord, DbError> {
        let expires_at = Utc::now() + ttl;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE otp_codes SET consumed = TRUE WHERE email = $1 AND NOT consumed")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        let record: OtpRecord = sqlx::query_as(
            r#"
            INSERT INTO otp_codes (email, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, email, code, attempts, consumed, expires_at, created_at
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Latest unconsumed code for an email, if any.
    ///
    /// Expired codes are still returned; the caller decides what an
    /// expired code means for the attempt.
    pub async fn latest_pending(&self, email: &str) -> Result<Option<OtpRecord>, DbError> {
        let record: Option<OtpRecord> = sqlx::query_as(
            r#"
            SELECT id, email, code, attempts, consumed, expires_at, created_at
            FROM otp_codes
            WHERE email = $1 AND NOT consumed
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Record a failed attempt, returning the updated counter.
    pub async fn record_failure(&self, id: Uuid) -> Result<i32, DbError> {
        let (attempts,): (i32,) = sqlx::query_as(
            "UPDATE otp_codes SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(attempts)
    }
}

/// Delete expired and consumed codes.
pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM otp_codes WHERE consumed OR expires_at < NOW()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p jotter-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn issue_retires_previous_codes() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = OtpRepo::new(&pool);
        let email = "otp-test@example.com";

        repo.issue(email, "111111", Duration::minutes(10))
            .await
            .expect("first issue");
        let second = repo
            .issue(email, "222222", Duration::minutes(10))
            .await
            .expect("second issue");

        let pending = repo
            .latest_pending(email)
            .await
            .expect("query")
            .expect("pending code");
        assert_eq!(pending.id, second.id);
        assert_eq!(pending.code, "222222");
    }
}
