//! Close action: releases the browser and resets session state

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CloseBrowserArgs {}

pub struct CloseBrowserAction {
    session: Arc<BrowserSession>,
}

impl CloseBrowserAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for CloseBrowserAction {
    fn name(&self) -> &'static str {
        "close_browser"
    }

    fn description(&self) -> &'static str {
        "Close the browser and clean up all session resources. Idempotent; a \
         new browser launches automatically on the next navigation.\n\n\
         Example: close_browser()"
    }

    fn input_schema(&self) -> Value {
        schema_value::<CloseBrowserArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let _args: CloseBrowserArgs = parse_args(args)?;

        let was_running = self.session.is_running().await;
        self.session.close().await;

        let message = if was_running {
            "Browser closed and session reset"
        } else {
            "No browser running; session already clean"
        };

        Ok(ActionOutput::message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn close_is_idempotent() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = CloseBrowserAction::new(session);

        let first = action.execute(json!({})).await.unwrap();
        let second = action.execute(json!({})).await.unwrap();

        assert!(first.message.contains("clean") || first.message.contains("closed"));
        assert!(second.message.contains("already clean"));
    }
}
