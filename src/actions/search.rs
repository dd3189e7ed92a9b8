//! Search action: composite navigate-and-extract over Google results

use std::sync::Arc;

use chromiumoxide::Page;
use chromiumoxide_cdp::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::navigate::{WaitUntil, open_page};
use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::constants::MAX_SEARCH_RESULTS;
use crate::utils::validate_navigation_timeout;

fn default_num_results() -> usize {
    5
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchGoogleArgs {
    /// Search query text
    pub query: String,

    /// Number of search results to extract (1-20)
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: String,
}

pub(crate) fn build_search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query.trim())
    )
}

// Result extraction runs in one page-side call: per-result CDP round trips
// are slow and racy when the results page re-renders.
const EXTRACT_RESULTS_FN: &str = r#"(limit) => {
    return Array.from(document.querySelectorAll('div.g')).slice(0, limit).map(g => {
        const title = g.querySelector('h3');
        const link = g.querySelector('a');
        const snippet = g.querySelector('div.VwiC3b');
        if (!title || !link) return null;
        return {
            title: title.innerText,
            url: link.getAttribute('href'),
            snippet: snippet ? snippet.innerText : ''
        };
    }).filter(Boolean);
}"#;

async fn extract_results(page: &Page, limit: usize) -> Result<Vec<SearchHit>, ActionError> {
    let call = CallFunctionOnParams::builder()
        .function_declaration(EXTRACT_RESULTS_FN)
        .argument(CallArgument::builder().value(json!(limit)).build())
        .return_by_value(true)
        .build()
        .map_err(|e| ActionError::Browser(format!("Failed to build extraction params: {}", e)))?;

    let result = page
        .evaluate_function(call)
        .await
        .map_err(|e| ActionError::Browser(format!("Result extraction failed: {}", e)))?;

    result
        .into_value()
        .map_err(|e| ActionError::Browser(format!("Failed to parse search results: {}", e)))
}

pub struct SearchGoogleAction {
    session: Arc<BrowserSession>,
}

impl SearchGoogleAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for SearchGoogleAction {
    fn name(&self) -> &'static str {
        "search_google"
    }

    fn description(&self) -> &'static str {
        "Perform a Google search and extract the top results as \
         {title, url, snippet} records. High-level convenience combining \
         navigation and extraction.\n\n\
         Example: search_google({\"query\": \"rust async programming\", \"num_results\": 5})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<SearchGoogleArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: SearchGoogleArgs = parse_args(args)?;

        if args.query.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "query cannot be empty".to_string(),
            ));
        }
        if args.num_results == 0 || args.num_results > MAX_SEARCH_RESULTS {
            return Err(ActionError::InvalidParameter(format!(
                "num_results must be in 1..={} (got {})",
                MAX_SEARCH_RESULTS, args.num_results
            )));
        }

        info!(query = %args.query, "starting web search");

        let timeout = validate_navigation_timeout(
            None,
            self.session.config().navigation_timeout_ms,
        )?;

        let search_url = build_search_url(&args.query);
        let page = open_page(&self.session, &search_url, WaitUntil::NetworkIdle, timeout).await?;

        let results = extract_results(&page, args.num_results).await?;

        info!(query = %args.query, count = results.len(), "search completed");

        Ok(ActionOutput::data(
            format!("Found {} search results", results.len()),
            json!({
                "query": args.query,
                "count": results.len(),
                "results": results,
            }),
        ))
    }
}
