//! Signin endpoints: request a code, verify it, manage the session
//!
//! All failure modes of /auth/verify are 401 with a distinct message;
//! attempt accounting happens here against the policy in
//! `models::otp`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::repos::{OtpRepo, SessionRepo, User};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;
use crate::models::{evaluate_attempt, AttemptOutcome, EmailAddress, OtpCode, PendingCode};

/// Request a sign-in code
#[derive(Deserialize)]
pub struct RequestCodeBody {
    pub email: String,
}

#[derive(Serialize)]
pub struct RequestCodeResponse {
    pub email: String,
    pub expires_at: String,
}

/// Verify a sign-in code
#[derive(Deserialize)]
pub struct VerifyBody {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// POST /auth/request - issue a code and email it
async fn request_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RequestCodeBody>,
) -> Result<(StatusCode, Json<RequestCodeResponse>), ApiError> {
    let email = EmailAddress::new(&req.email)?;

    let code = jotter_core::rng::otp_code();
    let record = OtpRepo::new(&state.pool)
        .issue(email.as_str(), &code, state.auth.otp_ttl)
        .await?;

    // Code row first; a failed send does not roll it back.
    state
        .mailer
        .send_code(email.as_str(), &code, state.auth.otp_ttl)
        .await?;

    tracing::info!(email = %email.as_str(), "sign-in code issued");

    Ok((
        StatusCode::ACCEPTED,
        Json(RequestCodeResponse {
            email: email.into_string(),
            expires_at: record.expires_at.to_rfc3339(),
        }),
    ))
}

/// POST /auth/verify - exchange a code for a session token
async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    let email = EmailAddress::new(&req.email)?;
    let code = OtpCode::new(&req.code)?;

    let otps = OtpRepo::new(&state.pool);
    let record = otps
        .latest_pending(email.as_str())
        .await?
        .ok_or(ApiError::Unauthorized {
            reason: "invalid code",
        })?;

    let pending = PendingCode {
        code: &record.code,
        attempts: record.attempts,
        expires_at: record.expires_at,
    };

    match evaluate_attempt(&pending, &code, Utc::now(), state.auth.otp_max_attempts) {
        AttemptOutcome::Verified => {
            let token = jotter_core::rng::session_token();
            let (session, user) = SessionRepo::new(&state.pool)
                .establish(record.id, email.as_str(), &token, state.auth.session_ttl)
                .await?;

            tracing::info!(user_id = %user.id, "session established");

            Ok(Json(SessionResponse {
                token: session.token,
                expires_at: session.expires_at.to_rfc3339(),
                user: user.into(),
            }))
        }
        AttemptOutcome::Mismatch => {
            let attempts = otps.record_failure(record.id).await?;
            tracing::debug!(email = %email.as_str(), attempts, "wrong sign-in code");
            Err(ApiError::Unauthorized {
                reason: "invalid code",
            })
        }
        AttemptOutcome::Expired => Err(ApiError::Unauthorized {
            reason: "code expired",
        }),
        AttemptOutcome::Exhausted => Err(ApiError::Unauthorized {
            reason: "too many attempts",
        }),
    }
}

/// POST /auth/logout - revoke the current session
async fn logout(State(state): State<Arc<AppState>>, auth: AuthUser) -> Result<StatusCode, ApiError> {
    SessionRepo::new(&state.pool).delete(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - current user
async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.user.into())
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/request", post(request_code))
        .route("/auth/verify", post(verify))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}
