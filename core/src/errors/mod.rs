//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{OtpError, ValidationError};

use otp_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// The OTP outcome carried by this error, if any
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(err) => Some(err),
            _ => None,
        }
    }
}

impl From<otp_shared::ConfigError> for DomainError {
    fn from(err: otp_shared::ConfigError) -> Self {
        DomainError::Validation {
            message: err.to_string(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Otp(err) => err.to_error_response(),
            DomainError::ValidationErr(err) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string())
            }
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            // Internal details stay in the logs
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal error")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
