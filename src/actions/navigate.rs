//! Navigation action: loads a URL and waits for the requested readiness signal

use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide_cdp::cdp::browser_protocol::emulation::SetScriptExecutionDisabledParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::constants::NETWORK_IDLE_SETTLE_MS;
use crate::utils::validate_navigation_timeout;

/// Page-readiness signal that completes a navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// Initial response received
    Commit,
    /// DOM parsed, subresources may still be loading
    DomContentLoaded,
    /// Full load event fired
    #[default]
    Load,
    /// Load event fired and the network has settled
    NetworkIdle,
}

impl WaitUntil {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::DomContentLoaded => "domcontentloaded",
            Self::Load => "load",
            Self::NetworkIdle => "networkidle",
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateToUrlArgs {
    /// Full URL to navigate to (must include http:// or https://)
    pub url: String,

    /// When navigation is considered complete
    #[serde(default)]
    pub wait_until: WaitUntil,

    /// Navigation timeout in milliseconds (config default when unset)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Validate protocol and syntax without touching the browser.
pub(crate) fn validate_url(url: &str) -> Result<(), ActionError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ActionError::InvalidParameter(
            "URL must start with http:// or https://".to_string(),
        ));
    }
    url::Url::parse(url)
        .map_err(|e| ActionError::InvalidParameter(format!("malformed URL '{}': {}", url, e)))?;
    Ok(())
}

/// Open a fresh page at `url`, enforcing the single-page model.
///
/// All existing pages are closed first so the session's "current page" is
/// never ambiguous. The new page becomes the session's current page on
/// success. Shared by `navigate_to_url` and `search_google`.
pub(crate) async fn open_page(
    session: &BrowserSession,
    url: &str,
    wait_until: WaitUntil,
    timeout: Duration,
) -> Result<Page, ActionError> {
    let browser_arc = session.ensure_started().await?;
    let browser_guard = browser_arc.lock().await;
    let wrapper = browser_guard
        .as_ref()
        .ok_or_else(|| ActionError::Browser("Browser not available after launch".to_string()))?;

    // Close stray pages; prevents non-deterministic page selection later
    if let Ok(existing_pages) = wrapper.browser().pages().await {
        for page in existing_pages {
            // Pages might already be closed or unresponsive
            let _ = page.close().await;
        }
    }

    let page = wrapper
        .browser()
        .new_page("about:blank")
        .await
        .map_err(|e| ActionError::Browser(format!("Failed to create page: {}", e)))?;
    drop(browser_guard);

    if !session.config().javascript_enabled {
        page.execute(SetScriptExecutionDisabledParams::new(true))
            .await
            .map_err(|e| {
                ActionError::Browser(format!("Failed to disable script execution: {}", e))
            })?;
    }

    let navigation = async {
        page.goto(url).await.map_err(|e| {
            ActionError::Browser(format!(
                "Navigation failed for URL: {}. \
                 Check: (1) URL is correctly formatted, \
                 (2) Network connectivity, \
                 (3) URL returns a valid HTTP response. \
                 Error: {}",
                url, e
            ))
        })?;

        match wait_until {
            WaitUntil::Commit => {}
            WaitUntil::DomContentLoaded => wait_for_dom_ready(&page).await?,
            WaitUntil::Load => {
                wait_for_load(&page).await?;
            }
            WaitUntil::NetworkIdle => {
                wait_for_load(&page).await?;
                tokio::time::sleep(Duration::from_millis(NETWORK_IDLE_SETTLE_MS)).await;
            }
        }

        Ok::<(), ActionError>(())
    };

    tokio::time::timeout(timeout, navigation)
        .await
        .map_err(|_| ActionError::NavigationTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })??;

    session.set_current_page(page.clone()).await;
    Ok(page)
}

async fn wait_for_load(page: &Page) -> Result<(), ActionError> {
    page.wait_for_navigation()
        .await
        .map_err(|e| ActionError::Browser(format!("Failed waiting for page load: {}", e)))?;
    Ok(())
}

async fn wait_for_dom_ready(page: &Page) -> Result<(), ActionError> {
    loop {
        let ready: String = page
            .evaluate("document.readyState")
            .await
            .map_err(|e| ActionError::Browser(format!("readyState probe failed: {}", e)))?
            .into_value()
            .unwrap_or_else(|_| "loading".to_string());

        if ready != "loading" {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

pub struct NavigateToUrlAction {
    session: Arc<BrowserSession>,
}

impl NavigateToUrlAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for NavigateToUrlAction {
    fn name(&self) -> &'static str {
        "navigate_to_url"
    }

    fn description(&self) -> &'static str {
        "Navigate to a URL and wait for the page to load. Returns the final URL \
         (which may differ due to redirects) and the page title.\n\n\
         Example: navigate_to_url({\"url\": \"https://example.com\", \"wait_until\": \"load\"})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<NavigateToUrlArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: NavigateToUrlArgs = parse_args(args)?;
        validate_url(&args.url)?;

        let timeout = validate_navigation_timeout(
            args.timeout_ms,
            self.session.config().navigation_timeout_ms,
        )?;

        debug!(url = %args.url, wait_until = args.wait_until.as_str(), "navigating");
        let page = open_page(&self.session, &args.url, args.wait_until, timeout).await?;

        let final_url = page
            .url()
            .await
            .map_err(|e| ActionError::Browser(format!("Failed to get URL: {}", e)))?
            .unwrap_or_else(|| args.url.clone());

        let title = page.get_title().await.ok().flatten().unwrap_or_default();

        Ok(ActionOutput::data(
            format!("Navigated to {}", final_url),
            json!({
                "url": final_url,
                "requested_url": args.url,
                "redirected": final_url != args.url,
                "title": title,
                "wait_until": args.wait_until.as_str(),
            }),
        ))
    }
}
