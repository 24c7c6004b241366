//! OTP code format and verification policy
//!
//! The attempt evaluation is a pure function over a snapshot of the
//! stored code, so every guarded transition is unit-testable without
//! a database. The repository layer persists whatever outcome this
//! returns.

use chrono::{DateTime, Utc};

use super::ValidationError;

/// Number of digits in an OTP code
const OTP_CODE_LEN: usize = 6;

/// Validated OTP code: exactly six ASCII digits, leading zeros kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "code" });
        }

        if trimmed.len() != OTP_CODE_LEN || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "code",
                reason: "must be exactly 6 digits",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a stored, unconsumed OTP code
#[derive(Debug, Clone)]
pub struct PendingCode<'a> {
    /// The stored code digits
    pub code: &'a str,
    /// Failed attempts recorded so far
    pub attempts: i32,
    /// When the code stops being verifiable
    pub expires_at: DateTime<Utc>,
}

/// Result of evaluating one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Code matches and is still live
    Verified,
    /// Code is live but the submitted digits are wrong
    Mismatch,
    /// Code expired before this attempt
    Expired,
    /// Maximum attempts already used
    Exhausted,
}

/// Evaluate a verification attempt against a pending code.
///
/// Order matters: an expired code reports `Expired` even when its
/// attempts are also exhausted, and an exhausted code reports
/// `Exhausted` even when the digits would have matched.
pub fn evaluate_attempt(
    pending: &PendingCode<'_>,
    submitted: &OtpCode,
    now: DateTime<Utc>,
    max_attempts: i32,
) -> AttemptOutcome {
    if now >= pending.expires_at {
        return AttemptOutcome::Expired;
    }

    if pending.attempts >= max_attempts {
        return AttemptOutcome::Exhausted;
    }

    if pending.code == submitted.as_str() {
        AttemptOutcome::Verified
    } else {
        AttemptOutcome::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn pending(code: &str, attempts: i32, ttl_secs: i64) -> PendingCode<'_> {
        PendingCode {
            code,
            attempts,
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    #[test]
    fn code_keeps_leading_zeros() {
        let code = OtpCode::new("012345").unwrap();
        assert_eq!(code.as_str(), "012345");
    }

    #[test]
    fn code_rejects_wrong_length() {
        assert!(OtpCode::new("12345").is_err());
        assert!(OtpCode::new("1234567").is_err());
    }

    #[test]
    fn code_rejects_non_digits() {
        let err = OtpCode::new("12a456").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn correct_code_verifies() {
        let p = pending("123456", 0, 600);
        let submitted = OtpCode::new("123456").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Verified
        );
    }

    #[test]
    fn wrong_code_is_mismatch() {
        let p = pending("123456", 0, 600);
        let submitted = OtpCode::new("654321").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Mismatch
        );
    }

    #[test]
    fn expired_code_never_verifies() {
        let p = pending("123456", 0, -1);
        let submitted = OtpCode::new("123456").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Expired
        );
    }

    #[test]
    fn exhausted_code_never_verifies() {
        let p = pending("123456", 5, 600);
        let submitted = OtpCode::new("123456").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Exhausted
        );
    }

    #[test]
    fn last_attempt_still_counts() {
        // attempts == max - 1 leaves one try
        let p = pending("123456", 4, 600);
        let submitted = OtpCode::new("123456").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Verified
        );
    }

    #[test]
    fn expiry_wins_over_exhaustion() {
        let p = pending("123456", 9, -1);
        let submitted = OtpCode::new("123456").unwrap();
        assert_eq!(
            evaluate_attempt(&p, &submitted, Utc::now(), 5),
            AttemptOutcome::Expired
        );
    }
}
