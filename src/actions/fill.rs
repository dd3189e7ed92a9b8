//! Fill action: types into inputs, optionally submitting with Enter

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::{validate_interaction_timeout, wait_for_element};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FillInputArgs {
    /// CSS selector for the input field (e.g. 'input#email', 'textarea[name="message"]')
    pub selector: String,

    /// Text to enter into the field (existing content is cleared first)
    pub value: String,

    /// Press Enter after filling (useful for search boxes)
    #[serde(default)]
    pub submit: bool,

    /// Timeout in milliseconds for locating the element
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub struct FillInputAction {
    session: Arc<BrowserSession>,
}

impl FillInputAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for FillInputAction {
    fn name(&self) -> &'static str {
        "fill_input"
    }

    fn description(&self) -> &'static str {
        "Fill a text input, textarea, or contenteditable element. Clears the \
         field first, then types the value. Set submit to press Enter after.\n\n\
         Example: fill_input({\"selector\": \"#search-box\", \"value\": \"rust async\", \"submit\": true})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<FillInputArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: FillInputArgs = parse_args(args)?;

        if args.selector.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "selector cannot be empty".to_string(),
            ));
        }

        let timeout = validate_interaction_timeout(args.timeout_ms, 5_000)?;
        let page = self.session.require_page().await?;

        let element = wait_for_element(&page, &args.selector, timeout).await?;

        element.scroll_into_view().await.map_err(|e| {
            ActionError::Browser(format!(
                "Failed to scroll element into view for selector '{}': {}",
                args.selector, e
            ))
        })?;

        // Click to focus before typing
        let point = element.clickable_point().await.map_err(|e| {
            ActionError::Browser(format!(
                "Failed to get clickable point for selector '{}'. \
                 Element may not be visible. Error: {}",
                args.selector, e
            ))
        })?;

        page.click(point).await.map_err(|e| {
            ActionError::Browser(format!(
                "Click to focus failed for selector '{}'. \
                 Possible causes: (1) Element is obscured, \
                 (2) Element is disabled or not focusable. \
                 Error: {}",
                args.selector, e
            ))
        })?;

        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| {
                ActionError::Browser(format!(
                    "Failed to clear field for selector '{}'. \
                     Possible causes: (1) Element is not an input/textarea, \
                     (2) Field is read-only or disabled. \
                     Error: {}",
                    args.selector, e
                ))
            })?;

        element.type_str(&args.value).await.map_err(|e| {
            ActionError::Browser(format!(
                "Typing failed for selector '{}'. \
                 Possible causes: (1) Element lost focus during typing, \
                 (2) Element is not a text input, \
                 (3) Field has input restrictions. \
                 Error: {}",
                args.selector, e
            ))
        })?;

        if args.submit {
            element.press_key("Enter").await.map_err(|e| {
                ActionError::Browser(format!(
                    "Failed to press Enter on selector '{}': {}",
                    args.selector, e
                ))
            })?;
        }

        Ok(ActionOutput::data(
            format!("Filled {} with {} characters", args.selector, args.value.len()),
            json!({
                "selector": args.selector,
                "value_length": args.value.len(),
                "submitted": args.submit,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_defaults_off() {
        let args: FillInputArgs =
            serde_json::from_value(json!({"selector": "#q", "value": "test"})).unwrap();
        assert!(!args.submit);
    }

    #[tokio::test]
    async fn fill_without_page_reports_no_active_session() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = FillInputAction::new(session);
        let err = action
            .execute(json!({"selector": "#q", "value": "test"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "NoActiveSession");
    }
}
