//! Screenshot action: captures the page, viewport, or a single element

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide_cdp::cdp::browser_protocol::page::CaptureScreenshotFormat;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TakeScreenshotArgs {
    /// Capture the entire scrollable page instead of just the viewport
    #[serde(default)]
    pub full_page: bool,

    /// CSS selector to capture a single element instead of the page.
    /// Mutually exclusive with full_page.
    #[serde(default)]
    pub element_selector: Option<String>,
}

pub struct TakeScreenshotAction {
    session: Arc<BrowserSession>,
}

impl TakeScreenshotAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for TakeScreenshotAction {
    fn name(&self) -> &'static str {
        "take_screenshot"
    }

    fn description(&self) -> &'static str {
        "Capture a PNG screenshot of the visible viewport, the full scrollable \
         page (full_page), or one element (element_selector). The two capture \
         modes are mutually exclusive. Returns a base64 data URI in the image \
         field.\n\n\
         Example: take_screenshot({\"full_page\": true})\n\
         Example: take_screenshot({\"element_selector\": \"#chart\"})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<TakeScreenshotArgs>()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: TakeScreenshotArgs = parse_args(args)?;

        // Fixed policy: conflicting capture modes are rejected, not resolved
        if args.full_page && args.element_selector.is_some() {
            return Err(ActionError::InvalidParameter(
                "full_page and element_selector are mutually exclusive capture modes".to_string(),
            ));
        }

        let page = self.session.require_page().await?;

        let image_data = if let Some(selector) = &args.element_selector {
            let element =
                page.find_element(selector)
                    .await
                    .map_err(|e| ActionError::ElementNotFound {
                        selector: selector.clone(),
                        detail: format!(
                            "Verify: (1) Selector syntax is valid CSS, \
                             (2) Element exists on current page, \
                             (3) Element is not in an iframe (unsupported). \
                             Error: {}",
                            e
                        ),
                    })?;

            element
                .screenshot(CaptureScreenshotFormat::Png)
                .await
                .map_err(|e| {
                    ActionError::Browser(format!(
                        "Element screenshot failed for selector '{}'. \
                         Possible causes: (1) Element has no dimensions, \
                         (2) Element is off-screen, \
                         (3) Page is still loading. \
                         Error: {}",
                        selector, e
                    ))
                })?
        } else {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(args.full_page)
                .build();

            page.screenshot(params).await.map_err(|e| {
                ActionError::Browser(format!(
                    "Page screenshot failed. \
                     Possible causes: (1) Page has not fully loaded, \
                     (2) Page has excessive dimensions, \
                     (3) Browser is in an invalid state. \
                     Error: {}",
                    e
                ))
            })?
        };

        let data_uri = format!("data:image/png;base64,{}", BASE64.encode(&image_data));
        self.session.cache_screenshot(data_uri.clone()).await;

        let target = if args.element_selector.is_some() {
            "element"
        } else if args.full_page {
            "full page"
        } else {
            "viewport"
        };

        Ok(ActionOutput::image(
            format!(
                "Screenshot captured ({}, {} bytes, {})",
                target,
                image_data.len(),
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            data_uri,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn conflicting_capture_modes_are_rejected() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = TakeScreenshotAction::new(session);
        let err = action
            .execute(json!({"full_page": true, "element_selector": "#chart"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameter");
    }

    #[tokio::test]
    async fn screenshot_without_page_reports_no_active_session() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = TakeScreenshotAction::new(session);
        let err = action.execute(json!({})).await.unwrap_err();
        assert_eq!(err.kind(), "NoActiveSession");
    }

    #[test]
    fn capture_modes_default_to_viewport() {
        let args: TakeScreenshotArgs = serde_json::from_value(json!({})).unwrap();
        assert!(!args.full_page);
        assert!(args.element_selector.is_none());
    }
}
