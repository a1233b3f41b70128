//! Code and token generation, and constant-time comparison

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Number of distinct 6-digit codes
const CODE_SPACE: u32 = 1_000_000;

/// Largest multiple of `CODE_SPACE` that fits in a u32; draws at or above it are rejected
const UNBIASED_LIMIT: u32 = u32::MAX - (u32::MAX % CODE_SPACE);

/// Generate a cryptographically secure random 6-digit verification code
///
/// Uses OsRng (OS-provided CSPRNG). Draws are rejection-sampled so every
/// code in `000000..=999999` is equally likely.
///
/// # Returns
///
/// * `Ok(String)` - A zero-padded 6-digit code
/// * `Err(DomainError)` - If the OS random source is unavailable
pub fn generate_secure_code() -> DomainResult<String> {
    let mut bytes = [0u8; 4];
    loop {
        OsRng.try_fill_bytes(&mut bytes).map_err(rng_unavailable)?;
        let num = u32::from_le_bytes(bytes);
        if num < UNBIASED_LIMIT {
            return Ok(format!("{:06}", num % CODE_SPACE));
        }
    }
}

/// Generate an opaque reset token
///
/// A random (v4) UUID in its 32-character hex form.
pub fn generate_reset_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Perform constant-time comparison of two codes
///
/// The running time depends only on the length of the inputs, never on the
/// position of the first differing byte.
pub fn constant_time_compare(code_a: &str, code_b: &str) -> bool {
    if code_a.len() != code_b.len() {
        return false;
    }
    constant_time_eq(code_a.as_bytes(), code_b.as_bytes())
}

/// Probe the OS random source
///
/// Called once at construction so a missing CSPRNG fails startup instead of
/// the first request.
pub fn ensure_secure_rng() -> DomainResult<()> {
    let mut probe = [0u8; 8];
    OsRng.try_fill_bytes(&mut probe).map_err(rng_unavailable)
}

fn rng_unavailable(err: rand::Error) -> DomainError {
    tracing::error!(error = %err, event = "rng_unavailable", "OS random source unavailable");
    DomainError::Internal {
        message: format!("Secure random source unavailable: {}", err),
    }
}
