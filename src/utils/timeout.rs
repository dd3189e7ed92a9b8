//! Timeout validation for browser operations

use std::time::Duration;

use crate::error::ActionError;

/// Maximum timeout for navigation operations (5 minutes)
/// Covers slow-loading sites, heavy SPAs, and network delays
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000;

/// Maximum timeout for element interaction operations (30 seconds)
/// Covers dynamic element loading and animations
pub const MAX_INTERACTION_TIMEOUT_MS: u64 = 30_000;

/// Validate a timeout for navigation-class operations (navigate, search, wait).
pub fn validate_navigation_timeout(
    timeout_ms: Option<u64>,
    default_ms: u64,
) -> Result<Duration, ActionError> {
    let ms = timeout_ms.unwrap_or(default_ms);

    if ms == 0 || ms > MAX_NAVIGATION_TIMEOUT_MS {
        return Err(ActionError::InvalidParameter(format!(
            "timeout_ms must be in 1..={}ms, got {}ms",
            MAX_NAVIGATION_TIMEOUT_MS, ms
        )));
    }

    Ok(Duration::from_millis(ms))
}

/// Validate a timeout for element interactions (click, fill).
pub fn validate_interaction_timeout(
    timeout_ms: Option<u64>,
    default_ms: u64,
) -> Result<Duration, ActionError> {
    let ms = timeout_ms.unwrap_or(default_ms);

    if ms == 0 || ms > MAX_INTERACTION_TIMEOUT_MS {
        return Err(ActionError::InvalidParameter(format!(
            "timeout_ms must be in 1..={}ms, got {}ms",
            MAX_INTERACTION_TIMEOUT_MS, ms
        )));
    }

    Ok(Duration::from_millis(ms))
}
