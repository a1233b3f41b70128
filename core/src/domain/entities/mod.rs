//! Domain entities representing the OTP store records.

pub mod cooldown;
pub mod otp_record;
pub mod reset_token;

// Re-export commonly used types
pub use cooldown::CooldownRecord;
pub use otp_record::{
    OtpRecord, CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, DEFAULT_OTP_TTL_SECONDS,
};
pub use reset_token::{ResetToken, DEFAULT_RESET_TOKEN_TTL_SECONDS};
