//! Page content actions: rendered text and serialized markup

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPageTextArgs {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPageHtmlArgs {}

pub struct GetPageTextAction {
    session: Arc<BrowserSession>,
}

impl GetPageTextAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for GetPageTextAction {
    fn name(&self) -> &'static str {
        "get_page_text"
    }

    fn description(&self) -> &'static str {
        "Extract all visible text from the current page. Use this to understand \
         what is on the page before extracting specific elements.\n\n\
         Example: get_page_text()"
    }

    fn input_schema(&self) -> Value {
        schema_value::<GetPageTextArgs>()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let _args: GetPageTextArgs = parse_args(args)?;
        let page = self.session.require_page().await?;

        // Immediate extraction works for server-rendered pages
        let eval_result = page.evaluate("document.body.innerText").await.map_err(|e| {
            ActionError::Browser(format!(
                "Failed to extract page text. \
                 Possible causes: (1) Page has not fully loaded, \
                 (2) JavaScript execution was blocked, \
                 (3) Page body is empty or inaccessible. \
                 Error: {}",
                e
            ))
        })?;

        let text_value = eval_result
            .into_value()
            .unwrap_or(serde_json::Value::Null);

        let initial_text = match text_value {
            serde_json::Value::String(text) => text,
            _ => String::new(),
        };

        // Empty innerText usually means a SPA whose content lives in
        // JavaScript-rendered DOM; convert the rendered HTML instead.
        let text = if initial_text.trim().is_empty() {
            let html = page
                .content()
                .await
                .map_err(|e| ActionError::Browser(format!("Failed to get HTML content: {}", e)))?;
            html2md::parse_html(&html)
        } else {
            initial_text
        };

        Ok(ActionOutput::data(
            format!("Extracted {} characters of page text", text.len()),
            json!({
                "text": text,
                "length": text.len(),
            }),
        ))
    }
}

pub struct GetPageHtmlAction {
    session: Arc<BrowserSession>,
}

impl GetPageHtmlAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for GetPageHtmlAction {
    fn name(&self) -> &'static str {
        "get_page_html"
    }

    fn description(&self) -> &'static str {
        "Get the full HTML source of the current page, including \
         JavaScript-rendered DOM. Useful when you need the page structure.\n\n\
         Example: get_page_html()"
    }

    fn input_schema(&self) -> Value {
        schema_value::<GetPageHtmlArgs>()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let _args: GetPageHtmlArgs = parse_args(args)?;
        let page = self.session.require_page().await?;

        let html = page
            .content()
            .await
            .map_err(|e| ActionError::Browser(format!("Failed to get page HTML: {}", e)))?;

        Ok(ActionOutput::data(
            format!("Retrieved {} bytes of HTML", html.len()),
            json!({
                "html": html,
                "length": html.len(),
            }),
        ))
    }
}
