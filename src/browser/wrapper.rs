//! Ownership wrapper for a launched browser
//!
//! Ties together the Chrome process handle, the CDP event-handler task, and
//! the temporary profile directory. The handler MUST be aborted when the
//! browser goes away or it runs indefinitely against a dead websocket.

use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the temporary profile directory.
    ///
    /// Call only after `browser.wait()` has completed: Chrome must have
    /// released its file handles or removal fails on Windows. Blocking
    /// `std::fs` is used here since this also runs from Drop context.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Removing browser profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove profile directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop() kills the Chrome process itself

        if let Some(dir) = self.user_data_dir.as_ref() {
            warn!(
                "BrowserWrapper dropped without explicit close; profile directory orphaned: {}",
                dir.display()
            );
        }
    }
}
