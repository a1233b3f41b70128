//! # OtpGate Core
//!
//! Core business logic for the OtpGate password-reset flow.
//! This crate contains the OTP, cooldown and reset token entities, the
//! `OtpManager` that owns their in-memory state, the background cleanup
//! service, and the error types that the request-handling layer maps onto
//! its own protocol.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
