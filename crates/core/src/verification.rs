//! Email verification codes for account registration.

use rand::Rng;

/// Number of characters in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Seconds a verification code stays valid in the cache.
pub const CODE_TTL_SECS: u64 = 300;

/// Generate a random verification code: uppercase letters and digits.
pub fn generate_code() -> String {
    let code: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect();
    code.to_uppercase()
}

/// Cache key for the verification code of an email address.
pub fn code_cache_key(email: &str) -> String {
    format!("email:{email}")
}
