//! Click action: resolves a selector against the live DOM and clicks it

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::{validate_interaction_timeout, validate_navigation_timeout, wait_for_element};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClickElementArgs {
    /// CSS selector for the element to click (e.g. 'button#submit', '.menu-item')
    pub selector: String,

    /// Wait for page navigation after clicking (links, form submissions)
    #[serde(default)]
    pub wait_for_navigation: bool,

    /// Timeout in milliseconds for locating the element
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub struct ClickElementAction {
    session: Arc<BrowserSession>,
}

impl ClickElementAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for ClickElementAction {
    fn name(&self) -> &'static str {
        "click_element"
    }

    fn description(&self) -> &'static str {
        "Click an element on the page using a CSS selector. Scrolls the element \
         into view first. Set wait_for_navigation for links and submit buttons.\n\n\
         Example: click_element({\"selector\": \"button.login-btn\", \"wait_for_navigation\": true})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<ClickElementArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: ClickElementArgs = parse_args(args)?;

        if args.selector.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "selector cannot be empty".to_string(),
            ));
        }

        let timeout = validate_interaction_timeout(args.timeout_ms, 5_000)?;
        let page = self.session.require_page().await?;

        // Polling lookup waits out SPA rendering
        let element = wait_for_element(&page, &args.selector, timeout).await?;

        element.scroll_into_view().await.map_err(|e| {
            ActionError::Browser(format!(
                "Failed to scroll element into view for selector '{}': {}",
                args.selector, e
            ))
        })?;

        // Click the resolved point directly; element.click() can hang on
        // IntersectionObserver checks for partially covered elements
        let point = element.clickable_point().await.map_err(|e| {
            ActionError::Browser(format!(
                "Failed to get clickable point for selector '{}'. \
                 Element may not be visible. Error: {}",
                args.selector, e
            ))
        })?;

        page.click(point).await.map_err(|e| {
            ActionError::Browser(format!(
                "Click failed for selector '{}'. \
                 Possible causes: (1) Element is obscured by another element, \
                 (2) Element is disabled, \
                 (3) Page changed after finding element. \
                 Error: {}",
                args.selector, e
            ))
        })?;

        if args.wait_for_navigation {
            let nav_timeout = validate_navigation_timeout(
                None,
                self.session.config().navigation_timeout_ms,
            )?;

            let current_url = page.url().await.ok().flatten().unwrap_or_default();

            tokio::time::timeout(nav_timeout, page.wait_for_navigation())
                .await
                .map_err(|_| ActionError::NavigationTimeout {
                    url: current_url.clone(),
                    timeout_ms: nav_timeout.as_millis() as u64,
                })?
                .map_err(|e| {
                    ActionError::Browser(format!(
                        "Navigation after click failed for selector '{}': {}",
                        args.selector, e
                    ))
                })?;

            let new_url = page.url().await.ok().flatten().unwrap_or_default();
            return Ok(ActionOutput::data(
                format!("Clicked {} and navigated", args.selector),
                json!({
                    "selector": args.selector,
                    "navigated": true,
                    "new_url": new_url,
                }),
            ));
        }

        Ok(ActionOutput::data(
            format!("Clicked {}", args.selector),
            json!({
                "selector": args.selector,
                "navigated": false,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wait_defaults_off() {
        let args: ClickElementArgs =
            serde_json::from_value(json!({"selector": "#go"})).unwrap();
        assert!(!args.wait_for_navigation);
    }

    #[tokio::test]
    async fn empty_selector_is_rejected_before_any_browser_work() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = ClickElementAction::new(session);
        let err = action
            .execute(json!({"selector": "   "}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameter");
    }
}
