//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    constant_time_compare, generate_reset_token, generate_secure_code, CleanupResult, Clock,
    IssuedOtp, ManualClock, OtpCleanupConfig, OtpCleanupService, OtpManager, OtpManagerConfig,
    ResetGrant, StoreStats, SystemClock,
};
