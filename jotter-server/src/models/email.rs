//! Email address validation
//!
//! Deliberately loose pattern: one `@`, no whitespace, a dot in the
//! domain. The real arbiter of deliverability is the email provider;
//! this only keeps junk out of the database.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length per RFC 5321 path limits
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address, normalizing to lowercase.
    ///
    /// # Example
    /// ```
    /// use jotter_server::models::EmailAddress;
    ///
    /// let email = EmailAddress::new("Ada@Example.COM").unwrap();
    /// assert_eq!(email.as_str(), "ada@example.com");
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like user@domain.tld",
            });
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_addresses() {
        assert!(EmailAddress::new("user@example.com").is_ok());
        assert!(EmailAddress::new("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = EmailAddress::new("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn rejects_missing_at() {
        let err = EmailAddress::new("example.com").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_spaces() {
        let err = EmailAddress::new("a b@example.com").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_bare_domain() {
        let err = EmailAddress::new("user@localhost").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = EmailAddress::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        let local = "a".repeat(243);
        let ok = format!("{local}@example.com");
        assert_eq!(ok.len(), 255);
        let err = EmailAddress::new(&ok).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 254, .. }));
    }
}
