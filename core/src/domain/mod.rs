//! Domain layer containing the records tracked by the OTP store.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
