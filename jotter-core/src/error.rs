/// Structured error types for jotter-core.
///
/// Uses `thiserror` for composable errors. The binary crate
/// (jotter-cli) wraps these in `anyhow` for display.
use thiserror::Error;

/// Main error type for jotter-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration value missing or malformed
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Environment variable present but not valid for its type
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result type alias for jotter-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an invalid environment variable error
    pub fn invalid_env(var: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEnv {
            var,
            value: value.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::config("DATABASE_URL not set");
        assert_eq!(err.to_string(), "configuration error: DATABASE_URL not set");

        let err = CoreError::invalid_env("JOTTER_OTP_TTL_MINUTES", "ten", "expected an integer");
        assert!(err.to_string().contains("JOTTER_OTP_TTL_MINUTES"));
        assert!(err.to_string().contains("'ten'"));
    }
}
