//! Browser action implementations and the dispatch registry
//!
//! Each action is one externally invocable operation over the shared
//! session. The registry resolves action names, parses arguments, and
//! converts every outcome into the response envelope, so no failure ever
//! escapes the dispatch boundary.

mod click;
mod close;
mod content;
mod extract;
mod fill;
mod navigate;
mod screenshot;
mod script;
mod scroll;
mod search;
mod wait;

pub use click::ClickElementAction;
pub use close::CloseBrowserAction;
pub use content::{GetPageHtmlAction, GetPageTextAction};
pub use extract::ExtractElementsAction;
pub use fill::FillInputAction;
pub use navigate::{NavigateToUrlAction, WaitUntil};
pub use screenshot::TakeScreenshotAction;
pub use script::ExecuteJavascriptAction;
pub use scroll::{ScrollDirection, ScrollPageAction};
pub use search::SearchGoogleAction;
pub use wait::WaitForElementAction;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::envelope::{ActionOutput, Envelope};
use crate::error::ActionError;
use crate::session::BrowserSession;

/// One externally invocable browser operation.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema for the action's arguments (shown to the host).
    fn input_schema(&self) -> Value;

    /// Whether the action leaves browser state untouched.
    fn read_only(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError>;
}

/// Parse raw host arguments into a typed argument struct.
///
/// `null`/missing arguments are treated as `{}` so zero-argument actions
/// can be invoked without a params object.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ActionError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| ActionError::InvalidParameter(format!("invalid arguments: {}", e)))
}

pub(crate) fn schema_value<T: schemars::JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

/// Fixed name-to-action table over one shared session.
pub struct ActionRegistry {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Build the full action surface over `session`.
    pub fn with_default_actions(session: Arc<BrowserSession>) -> Self {
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(NavigateToUrlAction::new(session.clone())),
            Arc::new(GetPageTextAction::new(session.clone())),
            Arc::new(GetPageHtmlAction::new(session.clone())),
            Arc::new(ClickElementAction::new(session.clone())),
            Arc::new(FillInputAction::new(session.clone())),
            Arc::new(ExtractElementsAction::new(session.clone())),
            Arc::new(TakeScreenshotAction::new(session.clone())),
            Arc::new(ExecuteJavascriptAction::new(session.clone())),
            Arc::new(WaitForElementAction::new(session.clone())),
            Arc::new(SearchGoogleAction::new(session.clone())),
            Arc::new(ScrollPageAction::new(session.clone())),
            Arc::new(CloseBrowserAction::new(session)),
        ];
        Self { actions }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Action>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Execute `name` with `args`, always producing an envelope.
    pub async fn dispatch(&self, name: &str, args: Value) -> Envelope {
        match self.get(name) {
            Some(action) => action.execute(args).await.into(),
            None => Envelope::error(&ActionError::InvalidParameter(format!(
                "unknown action '{}'",
                name
            ))),
        }
    }
}
