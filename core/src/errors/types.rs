//! Domain-specific error types for OTP issuance and reset token redemption
//!
//! Messages are bilingual (English and Chinese). Verification failures are
//! deliberately collapsed: a wrong code, an expired code and an exhausted
//! code all surface as [`OtpError::InvalidOrExpiredOtp`].

use otp_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Expected, non-fatal outcomes of the OTP flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Too many requests. Please try again in {retry_after_seconds} seconds | 请求过于频繁，请在 {retry_after_seconds} 秒后重试")]
    CooldownActive { retry_after_seconds: u64 },

    #[error("Invalid or expired verification code | 验证码无效或已过期")]
    InvalidOrExpiredOtp,

    #[error("Invalid or expired reset token | 重置令牌无效或已过期")]
    TokenInvalid,
}

impl OtpError {
    /// Seconds the caller should wait before retrying, for cooldown errors
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            OtpError::CooldownActive { retry_after_seconds } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::CooldownActive { .. } => error_codes::COOLDOWN_ACTIVE,
            OtpError::InvalidOrExpiredOtp => error_codes::INVALID_OR_EXPIRED_OTP,
            OtpError::TokenInvalid => error_codes::TOKEN_INVALID,
        }
    }
}

/// Validation errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field} | 必填字段: {field}")]
    RequiredField { field: String },

    #[error("Value out of range for field: {field} (min: {min}, max: {max}) | 字段值超出范围: {field} (最小: {min}, 最大: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}

impl IntoErrorResponse for OtpError {
    fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.code(), self.to_string());
        match self.retry_after_seconds() {
            Some(seconds) => response.add_detail("retry_after_seconds", seconds),
            None => response,
        }
    }
}

/// Convert OtpError to ErrorResponse
impl From<OtpError> for ErrorResponse {
    fn from(err: OtpError) -> Self {
        err.to_error_response()
    }
}
