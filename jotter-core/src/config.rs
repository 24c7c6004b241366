//! Centralized configuration for the jotter service
//!
//! Environment-first: the CLI loads `.env` via dotenvy before calling
//! [`Config::from_env`], and command-line flags override whatever the
//! environment produced. Malformed numeric values are hard errors at
//! startup rather than silent defaults.

use std::env;
use std::net::SocketAddr;

use crate::error::{CoreError, Result};

/// Default bind address for the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:3033";

/// Default session lifetime in days
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Default OTP code lifetime in minutes
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;

/// Default maximum verification attempts per OTP code
pub const DEFAULT_OTP_MAX_ATTEMPTS: i32 = 5;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,

    /// Postgres connection string (required by serve/migrate, checked there)
    pub database_url: Option<String>,

    /// Session lifetime in days
    pub session_ttl_days: i64,

    /// OTP code lifetime in minutes
    pub otp_ttl_minutes: i64,

    /// Maximum verification attempts per OTP code
    pub otp_max_attempts: i32,

    /// Transactional email provider settings; None means log-only mailer
    pub mail: Option<MailConfig>,
}

/// Outbound email provider settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the transactional email API
    pub endpoint: String,

    /// Bearer token for the provider, if it requires one
    pub api_key: Option<String>,

    /// From address for sign-in emails
    pub from: String,
}

impl Config {
    /// Load config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load config through a lookup function (env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind = match lookup("JOTTER_BIND") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|_| CoreError::invalid_env("JOTTER_BIND", raw, "expected host:port"))?,
            None => DEFAULT_BIND.parse().expect("default bind must parse"),
        };

        let session_ttl_days = parse_int(
            "JOTTER_SESSION_TTL_DAYS",
            lookup("JOTTER_SESSION_TTL_DAYS"),
            DEFAULT_SESSION_TTL_DAYS,
        )?;
        let otp_ttl_minutes = parse_int(
            "JOTTER_OTP_TTL_MINUTES",
            lookup("JOTTER_OTP_TTL_MINUTES"),
            DEFAULT_OTP_TTL_MINUTES,
        )?;
        let otp_max_attempts = parse_int(
            "JOTTER_OTP_MAX_ATTEMPTS",
            lookup("JOTTER_OTP_MAX_ATTEMPTS"),
            DEFAULT_OTP_MAX_ATTEMPTS as i64,
        )? as i32;

        if session_ttl_days <= 0 {
            return Err(CoreError::config("JOTTER_SESSION_TTL_DAYS must be positive"));
        }
        if otp_ttl_minutes <= 0 {
            return Err(CoreError::config("JOTTER_OTP_TTL_MINUTES must be positive"));
        }
        if otp_max_attempts <= 0 {
            return Err(CoreError::config("JOTTER_OTP_MAX_ATTEMPTS must be positive"));
        }

        let mail = match lookup("JOTTER_MAIL_ENDPOINT") {
            Some(endpoint) => {
                let from = lookup("JOTTER_MAIL_FROM").ok_or_else(|| {
                    CoreError::config("JOTTER_MAIL_FROM is required when JOTTER_MAIL_ENDPOINT is set")
                })?;
                Some(MailConfig {
                    endpoint,
                    api_key: lookup("JOTTER_MAIL_API_KEY"),
                    from,
                })
            }
            None => None,
        };

        Ok(Self {
            bind,
            database_url: lookup("DATABASE_URL"),
            session_ttl_days,
            otp_ttl_minutes,
            otp_max_attempts,
            mail,
        })
    }
}

fn parse_int(var: &'static str, raw: Option<String>, default: i64) -> Result<i64> {
    match raw {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| CoreError::invalid_env(var, raw, "expected an integer")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| map.get(var).map(|v| v.to_string())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let map = HashMap::new();
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        assert_eq!(config.bind.port(), 3033);
        assert_eq!(config.session_ttl_days, 30);
        assert_eq!(config.otp_ttl_minutes, 10);
        assert_eq!(config.otp_max_attempts, 5);
        assert!(config.database_url.is_none());
        assert!(config.mail.is_none());
    }

    #[test]
    fn reads_overrides() {
        let map = HashMap::from([
            ("JOTTER_BIND", "0.0.0.0:8080"),
            ("DATABASE_URL", "postgres://localhost/jotter"),
            ("JOTTER_SESSION_TTL_DAYS", "7"),
            ("JOTTER_OTP_MAX_ATTEMPTS", "3"),
        ]);
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.otp_max_attempts, 3);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/jotter")
        );
    }

    #[test]
    fn rejects_malformed_numbers() {
        let map = HashMap::from([("JOTTER_OTP_TTL_MINUTES", "ten")]);
        let err = Config::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidEnv { .. }));
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let map = HashMap::from([("JOTTER_SESSION_TTL_DAYS", "0")]);
        let err = Config::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn mail_requires_from_address() {
        let map = HashMap::from([("JOTTER_MAIL_ENDPOINT", "https://api.mail.example/send")]);
        let err = Config::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(err.to_string().contains("JOTTER_MAIL_FROM"));

        let map = HashMap::from([
            ("JOTTER_MAIL_ENDPOINT", "https://api.mail.example/send"),
            ("JOTTER_MAIL_FROM", "signin@jotter.example"),
        ]);
        let config = Config::from_lookup(lookup_from(&map)).unwrap();
        let mail = config.mail.unwrap();
        assert_eq!(mail.from, "signin@jotter.example");
        assert!(mail.api_key.is_none());
    }
}
