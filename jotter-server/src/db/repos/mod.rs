//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - single query per read (window functions for totals, no N+1)
//! - conflicts handled via ON CONFLICT, not check-then-insert
//! - multi-step writes wrapped in one transaction

use thiserror::Error;

pub mod notes;
pub mod otps;
pub mod sessions;

pub use notes::{Note, NoteRepo};
pub use otps::{OtpRecord, OtpRepo};
pub use sessions::{Session, SessionRepo, User};

/// Database error type shared by all repositories
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
