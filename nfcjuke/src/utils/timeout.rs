//! Timeout helpers used across the crate.
//!
//! Keep these helpers minimal: they centralize the commonly used default
//! timeout values and provide a small conversion helper so tests and code
//! can express timeouts in milliseconds clearly.

use std::time::Duration;

/// Default arming timeout for a write request when the admin API doesn't
/// supply one.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 60_000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Convenience: default write-request timeout as Duration.
pub fn default_write_timeout() -> Duration {
    ms(DEFAULT_WRITE_TIMEOUT_MS)
}
