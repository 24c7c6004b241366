//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::Duration;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::mailer::Mailer;

use super::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3033)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    /// Only use for development.
    pub cors_permissive: bool,

    /// OTP and session lifetimes
    pub auth: AuthSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3033)),
            cors_permissive: false,
            auth: AuthSettings::default(),
        }
    }
}

/// OTP and session lifetime settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub otp_ttl: Duration,
    pub otp_max_attempts: i32,
    pub session_ttl: Duration,
}

impl AuthSettings {
    /// Build from the environment-loaded config.
    pub fn from_config(config: &jotter_core::Config) -> Self {
        Self {
            otp_ttl: Duration::minutes(config.otp_ttl_minutes),
            otp_max_attempts: config.otp_max_attempts,
            session_ttl: Duration::days(config.session_ttl_days),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::minutes(jotter_core::config::DEFAULT_OTP_TTL_MINUTES),
            otp_max_attempts: jotter_core::config::DEFAULT_OTP_MAX_ATTEMPTS,
            session_ttl: Duration::days(jotter_core::config::DEFAULT_SESSION_TTL_DAYS),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub mailer: Arc<dyn Mailer>,
    pub auth: AuthSettings,
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// run_server(pool, Arc::new(LogMailer), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let state = AppState {
        pool,
        mailer,
        auth: config.auth.clone(),
    };

    // CORS configuration
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse().unwrap(),
                "http://localhost:5173".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
                "http://127.0.0.1:5173".parse().unwrap(),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build router
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::notes::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3033);
        assert!(!config.cors_permissive);
        assert_eq!(config.auth.otp_max_attempts, 5);
        assert_eq!(config.auth.otp_ttl, Duration::minutes(10));
        assert_eq!(config.auth.session_ttl, Duration::days(30));
    }
}
