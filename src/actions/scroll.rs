//! Scroll action: moves the viewport by page or to the extremes

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// One viewport up
    Up,
    /// One viewport down
    #[default]
    Down,
    /// To the beginning of the page
    Top,
    /// To the end of the page
    Bottom,
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    fn script(self) -> &'static str {
        match self {
            Self::Top => "window.scrollTo(0, 0)",
            Self::Bottom => "window.scrollTo(0, document.body.scrollHeight)",
            Self::Up => "window.scrollBy(0, -window.innerHeight)",
            Self::Down => "window.scrollBy(0, window.innerHeight)",
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScrollPageArgs {
    /// Scroll direction: 'up'/'down' one viewport, 'top'/'bottom' to the extremes
    #[serde(default)]
    pub direction: ScrollDirection,
}

pub struct ScrollPageAction {
    session: Arc<BrowserSession>,
}

impl ScrollPageAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for ScrollPageAction {
    fn name(&self) -> &'static str {
        "scroll_page"
    }

    fn description(&self) -> &'static str {
        "Scroll the page up or down by one viewport, or jump to the top or \
         bottom. Useful for triggering lazy-loaded and infinite-scroll \
         content.\n\n\
         Example: scroll_page({\"direction\": \"bottom\"})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<ScrollPageArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: ScrollPageArgs = parse_args(args)?;
        let page = self.session.require_page().await?;

        page.evaluate(args.direction.script())
            .await
            .map_err(|e| ActionError::Browser(format!("Scroll failed: {}", e)))?;

        Ok(ActionOutput::data(
            format!("Scrolled {}", args.direction.as_str()),
            json!({
                "direction": args.direction.as_str(),
            }),
        ))
    }
}
