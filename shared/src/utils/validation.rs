//! Input normalization for OTP keys

use once_cell::sync::Lazy;
use regex::Regex;

/// Pragmatic email shape: one `@`, no whitespace, a dotted domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email regex is valid")
});

/// Prefix under which email-derived OTP keys are tracked
pub const OTP_EMAIL_KEY_PREFIX: &str = "otp:email:";

/// Normalize an email address for use as an identity
///
/// Trims surrounding whitespace and lower-cases the address. Returns `None`
/// when nothing is left.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        None
    } else {
        Some(email)
    }
}

/// Derive the OTP store key for an email address
///
/// # Examples
///
/// ```
/// use otp_shared::validation::otp_key_for_email;
///
/// assert_eq!(otp_key_for_email("  A@X.com "), Some("otp:email:a@x.com".to_string()));
/// assert_eq!(otp_key_for_email("   "), None);
/// ```
pub fn otp_key_for_email(raw: &str) -> Option<String> {
    normalize_email(raw).map(|email| format!("{}{}", OTP_EMAIL_KEY_PREFIX, email))
}

/// Common validation functions
pub mod validators {
    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if an email address is valid (basic check)
    pub fn is_valid_email(email: &str) -> bool {
        super::EMAIL_REGEX.is_match(email)
    }
}
