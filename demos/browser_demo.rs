//! Browser action walkthrough
//!
//! Drives the action surface directly through the registry, without the
//! MCP transport: navigate, read text, extract links, screenshot, close.
//!
//! Run with: cargo run --example browser_demo

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use webpilot::{ActionRegistry, BrowserSession, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = Config::default();
    config.validate()?;

    let session = Arc::new(BrowserSession::new(config));
    let registry = ActionRegistry::with_default_actions(session.clone());

    info!("1. navigate_to_url -> example.com");
    let envelope = registry
        .dispatch(
            "navigate_to_url",
            json!({"url": "https://example.com", "wait_until": "load"}),
        )
        .await;
    println!("{}\n", envelope.to_json());

    info!("2. get_page_text");
    let envelope = registry.dispatch("get_page_text", json!({})).await;
    println!("{}\n", envelope.to_json());

    info!("3. extract_elements -> links");
    let envelope = registry
        .dispatch(
            "extract_elements",
            json!({"selector": "a", "attributes": ["text", "href"], "max_elements": 5}),
        )
        .await;
    println!("{}\n", envelope.to_json());

    info!("4. take_screenshot (viewport)");
    let envelope = registry.dispatch("take_screenshot", json!({})).await;
    // Data URI is large; report only status and size
    println!(
        "status={:?} image_bytes={}\n",
        envelope.status,
        envelope.image.as_ref().map(|i| i.len()).unwrap_or(0)
    );

    info!("5. close_browser");
    let envelope = registry.dispatch("close_browser", json!({})).await;
    println!("{}", envelope.to_json());

    session.close().await;
    Ok(())
}
