//! HTTP layer: axum server, routes, error mapping, extractors

pub mod error;
pub mod extractors;
mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{run_server, AppState, AuthSettings, ServerConfig};
