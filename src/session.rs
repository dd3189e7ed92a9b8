//! Browser session: the single owned browser/page pair
//!
//! One `BrowserSession` per tool instance. Actions receive it as an
//! injected `Arc`, never through ambient global state, which keeps the
//! dispatcher constructible in tests without a live browser.
//!
//! # Async Lock Requirements
//!
//! CRITICAL: browser access uses `tokio::sync::Mutex`, not a sync lock.
//! Every browser operation awaits, and sync guards cannot be held across
//! `.await` points.

use std::collections::VecDeque;
use std::sync::Arc;

use chromiumoxide::page::Page;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::Config;
use crate::browser::{BrowserWrapper, launch_browser};
use crate::error::ActionError;

/// Session-owned browser state with health checking and crash recovery
///
/// - At most one browser instance, lazy-launched on first use
///   (~2-3s first call, <1ms after)
/// - Health check on every access detects crashes and relaunches
///   transparently
/// - At most one active page, set by navigation
/// - Bounded screenshot cache (most recent `max_screenshots` data URIs)
pub struct BrowserSession {
    config: Config,
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
    current_page: Arc<Mutex<Option<Page>>>,
    screenshots: Arc<Mutex<VecDeque<String>>>,
}

impl BrowserSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            browser: Arc::new(Mutex::new(None)),
            current_page: Arc::new(Mutex::new(None)),
            screenshots: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get or launch the browser, with health checking and auto-recovery.
    ///
    /// # Flow
    /// 1. If a browser exists, verify it via the `version()` CDP command
    /// 2. If unhealthy, close the crashed instance and clean up
    /// 3. If no (healthy) browser, launch a new one
    ///
    /// Returns the shared browser slot; callers lock it to reach the
    /// wrapper.
    pub(crate) async fn ensure_started(
        &self,
    ) -> Result<Arc<Mutex<Option<BrowserWrapper>>>, ActionError> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser().version().await {
                Ok(_) => {
                    debug!("Browser health check passed, reusing existing browser");
                    drop(guard);
                    return Ok(self.browser.clone());
                }
                Err(e) => {
                    warn!("Browser health check failed: {}. Triggering recovery...", e);

                    if let Some(mut crashed) = guard.take() {
                        // Best-effort: the process may already be gone
                        let _ = crashed.browser_mut().close().await;
                        let _ = crashed.browser_mut().wait().await;
                        crashed.cleanup_temp_dir();
                    }
                    self.current_page.lock().await.take();

                    info!("Crashed browser cleaned up, launching new instance");
                }
            }
        }

        info!("Launching browser (first use or after recovery)");
        let (browser, handler, user_data_dir) = launch_browser(&self.config)
            .await
            .map_err(|e| ActionError::Launch(e.to_string()))?;
        *guard = Some(BrowserWrapper::new(browser, handler, user_data_dir));
        drop(guard);

        Ok(self.browser.clone())
    }

    /// The page set by the most recent navigation, if any.
    pub async fn current_page(&self) -> Option<Page> {
        self.current_page.lock().await.clone()
    }

    /// The current page, or `NoActiveSession`.
    ///
    /// Does NOT launch a browser: an action that needs an existing page has
    /// nothing to do with a blank one.
    pub async fn require_page(&self) -> Result<Page, ActionError> {
        self.current_page
            .lock()
            .await
            .clone()
            .ok_or(ActionError::NoActiveSession)
    }

    /// Store the page produced by a navigation, replacing any previous one.
    pub async fn set_current_page(&self, page: Page) {
        *self.current_page.lock().await = Some(page);
    }

    /// Cache a screenshot data URI, evicting the oldest beyond the valve.
    pub async fn cache_screenshot(&self, data_uri: String) {
        let mut cache = self.screenshots.lock().await;
        while cache.len() >= self.config.max_screenshots {
            cache.pop_front();
        }
        cache.push_back(data_uri);
    }

    pub async fn cached_screenshot_count(&self) -> usize {
        self.screenshots.lock().await.len()
    }

    /// Non-blocking check of browser state.
    pub async fn is_running(&self) -> bool {
        self.browser.lock().await.is_some()
    }

    /// Shut down the browser and reset the session. Idempotent.
    ///
    /// Both `close()` and `wait()` are required: dropping the wrapper only
    /// aborts the handler task, and without an explicit close the Chrome
    /// process lingers as a zombie.
    pub async fn close(&self) {
        let mut guard = self.browser.lock().await;

        if let Some(mut wrapper) = guard.take() {
            info!("Shutting down browser");

            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }

            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }

            wrapper.cleanup_temp_dir();
            drop(wrapper);
        }
        drop(guard);

        self.current_page.lock().await.take();
        self.screenshots.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BrowserSession {
        BrowserSession::new(Config::default())
    }

    #[tokio::test]
    async fn fresh_session_has_no_browser_or_page() {
        let s = session();
        assert!(!s.is_running().await);
        assert!(s.current_page().await.is_none());
    }

    #[tokio::test]
    async fn require_page_fails_without_navigation() {
        let s = session();
        let err = s.require_page().await.unwrap_err();
        assert_eq!(err.kind(), "NoActiveSession");
    }

    #[tokio::test]
    async fn close_is_idempotent_on_cold_session() {
        let s = session();
        s.close().await;
        s.close().await;
        assert!(!s.is_running().await);
    }

    #[tokio::test]
    async fn screenshot_cache_is_bounded() {
        let config = Config {
            max_screenshots: 2,
            ..Config::default()
        };
        let s = BrowserSession::new(config);

        s.cache_screenshot("data:image/png;base64,a".into()).await;
        s.cache_screenshot("data:image/png;base64,b".into()).await;
        s.cache_screenshot("data:image/png;base64,c".into()).await;

        assert_eq!(s.cached_screenshot_count().await, 2);
    }

    #[tokio::test]
    async fn close_clears_screenshot_cache() {
        let s = session();
        s.cache_screenshot("data:image/png;base64,a".into()).await;
        s.close().await;
        assert_eq!(s.cached_screenshot_count().await, 0);
    }
}
