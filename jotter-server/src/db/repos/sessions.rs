//! Session and user repository
//!
//! A session row is the bearer token: resolution is one join filtered
//! on expiry, logout is a row delete. Expired rows are reaped by a
//! throttled background sweep spawned from resolution.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// Last sweep timestamp for throttling
static LAST_SWEEP: Lazy<AtomicI64> = Lazy::new(|| AtomicI64::new(0));

/// Minimum interval between sweep spawns (60 seconds)
const SWEEP_INTERVAL_SECS: i64 = 60;

/// User record
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Session record
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Session repository
pub struct SessionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Establish a session after successful OTP verification.
    ///
    /// One transaction: consume the verified code, create the user row
    /// if this is a first signin, insert the session.
    pub async fn establish(
        &self,
        otp_id: Uuid,
        email: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<(Session, User), DbError> {
        let expires_at = Utc::now() + ttl;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE otp_codes SET consumed = TRUE WHERE id = $1")
            .bind(otp_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO users (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        let user: User = sqlx::query_as("SELECT id, email, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&mut *tx)
            .await?;

        let session: Session = sqlx::query_as(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, expires_at, created_at
            "#,
        )
        .bind(token)
        .bind(user.id)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((session, user))
    }

    /// Resolve a bearer token to its session and user.
    ///
    /// Returns None for unknown or expired tokens. Spawns the expiry
    /// sweep opportunistically.
    pub async fn resolve(&self, token: &str) -> Result<Option<(Session, User)>, DbError> {
        self.spawn_sweep();

        let row = sqlx::query(
            r#"
            SELECT
                s.token,
                s.user_id,
                s.expires_at,
                s.created_at AS session_created_at,
                u.email,
                u.created_at AS user_created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            let user_id: Uuid = r.get("user_id");
            (
                Session {
                    token: r.get("token"),
                    user_id,
                    expires_at: r.get("expires_at"),
                    created_at: r.get("session_created_at"),
                },
                User {
                    id: user_id,
                    email: r.get("email"),
                    created_at: r.get("user_created_at"),
                },
            )
        }))
    }

    /// Delete a session (idempotent).
    pub async fn delete(&self, token: &str) -> Result<(), DbError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Spawn the expiry sweep, at most once per SWEEP_INTERVAL_SECS.
    fn spawn_sweep(&self) {
        let now = Utc::now().timestamp();
        let last = LAST_SWEEP.load(Ordering::Relaxed);

        if now - last < SWEEP_INTERVAL_SECS {
            return;
        }

        if LAST_SWEEP
            .compare_exchange(last, now, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            return; // another task claimed this slot
        }

        let pool: PgPool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(err) = sweep_expired(&pool).await {
                tracing::warn!("expiry sweep failed: {}", err);
            }
        });
    }
}

/// Delete expired sessions and stale OTP codes.
pub async fn sweep_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
        .execute(pool)
        .await?
        .rows_affected();
    let codes = super::otps::cleanup_expired(pool).await?;

    if sessions + codes > 0 {
        tracing::debug!(sessions, codes, "expiry sweep removed rows");
    }
    Ok(sessions + codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn establish_then_resolve_roundtrip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let email = "session-test@example.com";
        let otp = crate::db::repos::OtpRepo::new(&pool)
            .issue(email, "123456", Duration::minutes(10))
            .await
            .expect("issue");

        let repo = SessionRepo::new(&pool);
        let token = jotter_core::rng::session_token();
        let (session, user) = repo
            .establish(otp.id, email, &token, Duration::days(30))
            .await
            .expect("establish");
        assert_eq!(session.user_id, user.id);
        assert_eq!(user.email, email);

        let resolved = repo.resolve(&token).await.expect("resolve");
        assert!(resolved.is_some());

        repo.delete(&token).await.expect("delete");
        let resolved = repo.resolve(&token).await.expect("resolve after delete");
        assert!(resolved.is_none());
    }
}
