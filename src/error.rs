//! Action error taxonomy
//!
//! Every failure an action can produce is classified here and converted to
//! an error envelope at the dispatch boundary. Nothing propagates to the
//! host as a protocol fault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("No active page. Call navigate_to_url first.")]
    NoActiveSession,

    #[error("Element not found for selector '{selector}': {detail}")]
    ElementNotFound { selector: String, detail: String },

    #[error("Navigation timeout after {timeout_ms}ms for URL: {url}")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Element '{selector}' did not reach state '{state}' within {timeout_ms}ms")]
    WaitTimeout {
        selector: String,
        state: String,
        timeout_ms: u64,
    },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ActionError {
    /// Stable error-kind label carried in the envelope's `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch(_) => "LaunchError",
            Self::NoActiveSession => "NoActiveSession",
            Self::ElementNotFound { .. } => "ElementNotFound",
            Self::NavigationTimeout { .. } => "NavigationTimeout",
            Self::WaitTimeout { .. } => "WaitTimeout",
            Self::Script(_) => "ScriptError",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::Browser(_) => "BrowserError",
        }
    }
}
