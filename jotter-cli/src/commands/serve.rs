//! HTTP server command
//!
//! Loads config from the environment, applies flag overrides, picks
//! the mailer, and runs the server until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use jotter_core::Config;
use jotter_server::db::{create_pool, migrations};
use jotter_server::mailer::{HttpMailer, LogMailer, Mailer};
use jotter_server::{run_server, AuthSettings, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3033)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = Config::from_env()?;

    let database_url = args
        .database_url
        .or(config.database_url.clone())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let bind_addr = args.bind.unwrap_or(config.bind);
    tracing::info!("Starting jotter server on {}", bind_addr);

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => Arc::new(HttpMailer::new(
            mail.endpoint.clone(),
            mail.api_key.clone(),
            mail.from.clone(),
        )),
        None => {
            tracing::warn!("JOTTER_MAIL_ENDPOINT not set; sign-in codes will be logged, not emailed");
            Arc::new(LogMailer)
        }
    };

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
        auth: AuthSettings::from_config(&config),
    };

    // Run server (blocks until shutdown)
    run_server(pool, mailer, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
