// Stdio MCP server: browser automation actions
//
// Reads JSON-RPC requests on stdin and writes responses on stdout.
// All diagnostics go to stderr; stdout carries the protocol exclusively.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webpilot::server::McpServer;
use webpilot::{ActionRegistry, BrowserSession};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = webpilot::load_yaml_config().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        engine = config.browser_type.as_str(),
        viewport = format!("{}x{}", config.viewport.width, config.viewport.height),
        "starting browser action server"
    );

    let session = Arc::new(BrowserSession::new(config));
    let registry = ActionRegistry::with_default_actions(session.clone());
    let server = McpServer::new(registry);

    let result = server.serve_stdio().await;

    // Best-effort shutdown so no Chrome zombie outlives the host
    session.close().await;

    result
}
