//! jotter-server: HTTP API for the jotter notes service
//!
//! Email-OTP signin, opaque bearer sessions, and per-user notes CRUD
//! over PostgreSQL. The React client and the email provider live
//! outside this crate; the JSON API is the product surface here.

pub mod db;
pub mod http;
pub mod mailer;
pub mod models;

pub use http::server::{run_server, AppState, AuthSettings, ServerConfig};
