//! Wait action: blocks until a selector reaches a lifecycle state

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::{ElementState, validate_navigation_timeout, wait_for_element_state};

fn default_state() -> ElementState {
    ElementState::Visible
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WaitForElementArgs {
    /// CSS selector for the element to wait for
    pub selector: String,

    /// State to wait for: attached (in DOM), detached (removed),
    /// visible (displayed), hidden (not displayed)
    #[serde(default = "default_state")]
    pub state: ElementState,

    /// Maximum time to wait in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub struct WaitForElementAction {
    session: Arc<BrowserSession>,
}

impl WaitForElementAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for WaitForElementAction {
    fn name(&self) -> &'static str {
        "wait_for_element"
    }

    fn description(&self) -> &'static str {
        "Wait for an element to reach a specific state. Essential for dynamic \
         content, AJAX requests, and single-page applications.\n\n\
         Example: wait_for_element({\"selector\": \".results-loaded\", \
         \"state\": \"visible\", \"timeout_ms\": 10000})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<WaitForElementArgs>()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: WaitForElementArgs = parse_args(args)?;

        if args.selector.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "selector cannot be empty".to_string(),
            ));
        }

        // Long waits are legitimate for slow SPAs, so the navigation cap
        // applies rather than the interaction cap
        let timeout = validate_navigation_timeout(
            args.timeout_ms,
            self.session.config().default_timeout_ms,
        )?;

        let page = self.session.require_page().await?;
        wait_for_element_state(&page, &args.selector, args.state, timeout).await?;

        Ok(ActionOutput::data(
            format!(
                "Element {} reached state: {}",
                args.selector,
                args.state.as_str()
            ),
            json!({
                "selector": args.selector,
                "state": args.state.as_str(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_defaults_to_visible() {
        let args: WaitForElementArgs =
            serde_json::from_value(json!({"selector": ".spinner"})).unwrap();
        assert_eq!(args.state, ElementState::Visible);
    }

    #[tokio::test]
    async fn over_cap_timeout_is_invalid() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = WaitForElementAction::new(session);
        let err = action
            .execute(json!({"selector": ".x", "timeout_ms": 600_000}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameter");
    }
}
