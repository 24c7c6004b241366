//! jotter-core: shared foundation for the jotter service
//!
//! Holds the pieces both the server and the CLI need:
//! - environment-driven configuration (`config`)
//! - structured error types (`error`)
//! - secure random generation for OTP codes and session tokens (`rng`)

pub mod config;
pub mod error;
pub mod rng;

pub use config::{Config, MailConfig};
pub use error::{CoreError, Result};
