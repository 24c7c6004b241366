//! jotter CLI - notes service entry point
//!
//! Two jobs: run the HTTP API (`serve`) and prepare the database
//! (`migrate`). Configuration comes from the environment (a `.env`
//! file is honored) with flags taking precedence.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "jotter",
    author,
    version,
    about = "Notes service with email-code signin",
    long_about = "Runs the jotter HTTP API: email-OTP signin, bearer sessions, \
                  and per-user notes over PostgreSQL."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is already set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Run database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may be set another way
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Migrate(args) => commands::migrate::run_migrate(args).await,
    }
}
