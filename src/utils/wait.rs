//! Element polling for SPA support
//!
//! Elements on script-heavy pages appear after the load event fires, so
//! lookups poll with exponential backoff instead of failing on the first
//! miss. State probing runs through a parameterized CDP function call so
//! selector text is never interpolated into script source.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::element::Element;
use chromiumoxide_cdp::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ActionError;

/// Element lifecycle states a caller can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Present in the DOM
    Attached,
    /// Removed from (or never in) the DOM
    Detached,
    /// Present and rendered (non-zero box, not display:none/visibility:hidden)
    Visible,
    /// Not visible, whether attached or not
    Hidden,
}

impl ElementState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Observed probe outcome for a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Detached,
    Attached,
    Visible,
}

impl Probe {
    fn satisfies(self, state: ElementState) -> bool {
        match state {
            ElementState::Attached => self != Probe::Detached,
            ElementState::Detached => self == Probe::Detached,
            ElementState::Visible => self == Probe::Visible,
            ElementState::Hidden => self != Probe::Visible,
        }
    }
}

const PROBE_FN: &str = r#"(sel) => {
    const el = document.querySelector(sel);
    if (!el) return 'detached';
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const visible = style.visibility !== 'hidden'
        && style.display !== 'none'
        && rect.width > 0
        && rect.height > 0;
    return visible ? 'visible' : 'attached';
}"#;

/// Wait for an element to appear in the DOM.
///
/// Polls `find_element` with exponential backoff: 100ms start, doubling,
/// capped at 1 second, bounded by `timeout`.
pub async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<Element, ActionError> {
    let start = std::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Ok(element);
        }

        if start.elapsed() >= timeout {
            return Err(ActionError::ElementNotFound {
                selector: selector.to_string(),
                detail: format!(
                    "not found after {}ms. Try: (1) Verify the selector in browser dev tools, \
                     (2) Ensure the element has rendered, \
                     (3) Increase timeout_ms.",
                    timeout.as_millis()
                ),
            });
        }

        tokio::time::sleep(poll_interval).await;
        poll_interval = (poll_interval * 2).min(max_interval);
    }
}

/// Wait until a selector reaches the requested lifecycle state.
pub async fn wait_for_element_state(
    page: &Page,
    selector: &str,
    state: ElementState,
    timeout: Duration,
) -> Result<(), ActionError> {
    let start = std::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        if probe_element(page, selector).await?.satisfies(state) {
            return Ok(());
        }

        if start.elapsed() >= timeout {
            return Err(ActionError::WaitTimeout {
                selector: selector.to_string(),
                state: state.as_str().to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        tokio::time::sleep(poll_interval).await;
        poll_interval = (poll_interval * 2).min(max_interval);
    }
}

async fn probe_element(page: &Page, selector: &str) -> Result<Probe, ActionError> {
    let call = CallFunctionOnParams::builder()
        .function_declaration(PROBE_FN)
        .argument(CallArgument::builder().value(json!(selector)).build())
        .return_by_value(true)
        .build()
        .map_err(|e| ActionError::Browser(format!("Failed to build probe params: {}", e)))?;

    let result = page
        .evaluate_function(call)
        .await
        .map_err(|e| ActionError::Browser(format!("Element state probe failed: {}", e)))?;

    let observed: String = result
        .into_value()
        .map_err(|e| ActionError::Browser(format!("Failed to parse probe result: {}", e)))?;

    match observed.as_str() {
        "detached" => Ok(Probe::Detached),
        "attached" => Ok(Probe::Attached),
        "visible" => Ok(Probe::Visible),
        other => Err(ActionError::Browser(format!(
            "Unexpected probe result: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_round_trip() {
        for (name, state) in [
            ("attached", ElementState::Attached),
            ("detached", ElementState::Detached),
            ("visible", ElementState::Visible),
            ("hidden", ElementState::Hidden),
        ] {
            let parsed: ElementState = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(parsed, state);
            assert_eq!(state.as_str(), name);
        }
    }

    #[test]
    fn probe_satisfaction_matrix() {
        // attached is satisfied by anything in the DOM
        assert!(Probe::Attached.satisfies(ElementState::Attached));
        assert!(Probe::Visible.satisfies(ElementState::Attached));
        assert!(!Probe::Detached.satisfies(ElementState::Attached));

        // visible requires a rendered box
        assert!(Probe::Visible.satisfies(ElementState::Visible));
        assert!(!Probe::Attached.satisfies(ElementState::Visible));

        // hidden accepts invisible-but-attached and absent alike
        assert!(Probe::Attached.satisfies(ElementState::Hidden));
        assert!(Probe::Detached.satisfies(ElementState::Hidden));
        assert!(!Probe::Visible.satisfies(ElementState::Hidden));

        // detached only when gone
        assert!(Probe::Detached.satisfies(ElementState::Detached));
        assert!(!Probe::Attached.satisfies(ElementState::Detached));
    }
}
