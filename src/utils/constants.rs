//! Shared configuration constants
//!
//! Default values used throughout the crate to avoid magic numbers.

/// Default Chrome user agent, used when the `user_agent` valve is unset
///
/// Chrome releases a new stable roughly every 4 weeks; bump this a few
/// times a year to stay within a plausible version window.
/// Reference: https://chromiumdash.appspot.com/schedule
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Settle delay applied after load for `networkidle` navigations
pub const NETWORK_IDLE_SETTLE_MS: u64 = 500;

/// Result-item cap for `search_google`
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Element cap for `extract_elements`
pub const MAX_EXTRACT_ELEMENTS: usize = 100;
