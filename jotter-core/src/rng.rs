//! Secure random generation for OTP codes and session tokens

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::{Rng, RngCore};

/// Number of decimal digits in an OTP code
pub const OTP_CODE_LEN: usize = 6;

/// Number of random bytes behind a session token
const SESSION_TOKEN_BYTES: usize = 32;

/// Generate a 6-digit OTP code, leading zeros preserved.
pub fn otp_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// Generate an opaque session token: 32 random bytes, base64url without padding.
pub fn session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_code_is_six_digits() {
        for _ in 0..100 {
            let code = otp_code();
            assert_eq!(code.len(), OTP_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn session_token_is_url_safe() {
        let token = session_token();
        // 32 bytes -> ceil(32 * 4 / 3) = 43 chars without padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn session_tokens_do_not_repeat() {
        let a = session_token();
        let b = session_token();
        assert_ne!(a, b);
    }
}
