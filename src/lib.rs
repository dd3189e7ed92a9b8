//! Browser automation actions for AI agents
//!
//! Exposes a fixed set of session-bound browser actions (navigate, click,
//! fill, extract, screenshot, script evaluation, search) over MCP stdio.
//! All browser-engine work is delegated to chromiumoxide/Chrome.

pub mod actions;
mod browser;
pub mod envelope;
pub mod error;
pub mod server;
mod session;
mod utils;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::utils::timeout::{MAX_INTERACTION_TIMEOUT_MS, MAX_NAVIGATION_TIMEOUT_MS};

/// Browser engine selection
///
/// Only `chromium` is currently drivable: the backend speaks the Chrome
/// DevTools Protocol. `firefox` and `webkit` are accepted by the parser so
/// configs are portable, but rejected by [`Config::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

/// Session configuration ("valves"), read once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Browser engine to launch
    #[serde(default = "default_browser_type")]
    pub browser_type: BrowserEngine,

    /// Run browser without a visible window
    ///
    /// Headless-only policy: `false` fails validation. The dispatcher is
    /// built for server contexts where no display is available.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Default timeout for element interactions (click, fill, wait)
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Default timeout for page navigations
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Viewport dimensions
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Custom user agent string (pinned Chrome UA when unset)
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Enable JavaScript execution in pages
    #[serde(default = "default_javascript_enabled")]
    pub javascript_enabled: bool,

    /// Maximum number of screenshots kept in the in-memory cache
    #[serde(default = "default_max_screenshots")]
    pub max_screenshots: usize,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: u32,

    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

fn default_browser_type() -> BrowserEngine {
    BrowserEngine::Chromium
}

fn default_headless() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_javascript_enabled() -> bool {
    true
}

fn default_max_screenshots() -> usize {
    5
}

fn default_disable_security() -> bool {
    false // SECURE BY DEFAULT
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_type: default_browser_type(),
            headless: default_headless(),
            default_timeout_ms: default_timeout_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            viewport: ViewportConfig::default(),
            user_agent: None,
            javascript_enabled: default_javascript_enabled(),
            max_screenshots: default_max_screenshots(),
            disable_security: default_disable_security(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl Config {
    /// Validate the configuration once at session construction.
    ///
    /// Rejects combinations the dispatcher cannot honor rather than
    /// failing later mid-action.
    pub fn validate(&self) -> Result<()> {
        if self.browser_type != BrowserEngine::Chromium {
            anyhow::bail!(
                "browser_type '{}' is not supported: the CDP backend only drives chromium",
                self.browser_type.as_str()
            );
        }

        if !self.headless {
            anyhow::bail!(
                "headless must be true: headed launches are not supported in server contexts"
            );
        }

        if self.default_timeout_ms == 0 || self.default_timeout_ms > MAX_INTERACTION_TIMEOUT_MS {
            anyhow::bail!(
                "default_timeout_ms must be in 1..={} (got {})",
                MAX_INTERACTION_TIMEOUT_MS,
                self.default_timeout_ms
            );
        }

        if self.navigation_timeout_ms == 0 || self.navigation_timeout_ms > MAX_NAVIGATION_TIMEOUT_MS
        {
            anyhow::bail!(
                "navigation_timeout_ms must be in 1..={} (got {})",
                MAX_NAVIGATION_TIMEOUT_MS,
                self.navigation_timeout_ms
            );
        }

        if self.viewport.width == 0 || self.viewport.width > 10_000 {
            anyhow::bail!(
                "viewport.width must be in 1..=10000 (got {})",
                self.viewport.width
            );
        }

        if self.viewport.height == 0 || self.viewport.height > 10_000 {
            anyhow::bail!(
                "viewport.height must be in 1..=10000 (got {})",
                self.viewport.height
            );
        }

        if self.max_screenshots == 0 || self.max_screenshots > 100 {
            anyhow::bail!(
                "max_screenshots must be in 1..=100 (got {})",
                self.max_screenshots
            );
        }

        Ok(())
    }
}

/// Load config from `WEBPILOT_CONFIG` or `config.yaml` in the working directory.
///
/// A missing file is not an error: defaults apply.
pub fn load_yaml_config() -> Result<Config> {
    let config_path = std::env::var("WEBPILOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

pub use actions::{Action, ActionRegistry};
pub use browser::{download_managed_browser, find_browser_executable};
pub use envelope::{Envelope, Status};
pub use error::ActionError;
pub use session::BrowserSession;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        Config::default().validate().expect("defaults must be valid");
    }

    #[test]
    fn rejects_non_chromium_engines() {
        for engine in [BrowserEngine::Firefox, BrowserEngine::Webkit] {
            let config = Config {
                browser_type: engine,
                ..Config::default()
            };
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("not supported"), "unexpected error: {err}");
        }
    }

    #[test]
    fn rejects_headed_mode() {
        let config = Config {
            headless: false,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_timeouts() {
        let config = Config {
            default_timeout_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            navigation_timeout_ms: MAX_NAVIGATION_TIMEOUT_MS + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_sized_viewport() {
        let config = Config {
            viewport: ViewportConfig {
                width: 0,
                height: 720,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_yaml_valves() {
        let yaml = r#"
browser_type: chromium
headless: true
default_timeout_ms: 10000
viewport:
  width: 1920
  height: 1080
user_agent: "test-agent/1.0"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.browser_type, BrowserEngine::Chromium);
        assert_eq!(config.default_timeout_ms, 10_000);
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.user_agent.as_deref(), Some("test-agent/1.0"));
        // Unspecified fields fall back to defaults
        assert_eq!(config.navigation_timeout_ms, 30_000);
        assert_eq!(config.max_screenshots, 5);
    }

    #[test]
    fn engine_names_round_trip() {
        let parsed: BrowserEngine = serde_yaml::from_str("firefox").unwrap();
        assert_eq!(parsed, BrowserEngine::Firefox);
        assert_eq!(parsed.as_str(), "firefox");
    }
}
