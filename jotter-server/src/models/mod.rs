//! Domain models with validation
//!
//! Request input crosses into the domain through these newtypes; the
//! repositories and handlers never see an unvalidated email, title,
//! or code.

pub mod email;
pub mod note;
pub mod otp;
pub mod pagination;
pub mod validation;

pub use email::EmailAddress;
pub use note::{NoteBody, NoteTitle};
pub use otp::{evaluate_attempt, AttemptOutcome, OtpCode, PendingCode};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use validation::ValidationError;
