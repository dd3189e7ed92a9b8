//! Dispatcher integration tests
//!
//! Exercises the action surface through the registry the way the MCP layer
//! does. Everything here runs without a live browser: parameter validation
//! and session-state failures must short-circuit before any launch.

use std::sync::Arc;

use serde_json::{Value, json};
use webpilot::{ActionRegistry, BrowserSession, Config};

fn registry() -> (Arc<BrowserSession>, ActionRegistry) {
    let session = Arc::new(BrowserSession::new(Config::default()));
    let registry = ActionRegistry::with_default_actions(session.clone());
    (session, registry)
}

fn envelope_json(envelope: &webpilot::Envelope) -> Value {
    serde_json::from_str(&envelope.to_json()).unwrap()
}

#[tokio::test]
async fn invalid_url_fails_without_launching_a_browser() {
    let (session, registry) = registry();

    for url in ["ftp://example.com", "not-a-url", "javascript:alert(1)"] {
        let envelope = registry
            .dispatch("navigate_to_url", json!({"url": url}))
            .await;
        assert!(envelope.is_error(), "url should be rejected: {url}");
        assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));
    }

    assert!(
        !session.is_running().await,
        "URL validation must precede browser launch"
    );
}

#[tokio::test]
async fn page_level_actions_require_a_navigation_first() {
    let (session, registry) = registry();

    let cases = [
        ("get_page_text", json!({})),
        ("get_page_html", json!({})),
        ("click_element", json!({"selector": "#go"})),
        ("fill_input", json!({"selector": "#q", "value": "x"})),
        ("extract_elements", json!({"selector": "a"})),
        ("take_screenshot", json!({})),
        ("execute_javascript", json!({"script": "1 + 1"})),
        ("wait_for_element", json!({"selector": ".done"})),
        ("scroll_page", json!({})),
    ];

    for (name, args) in cases {
        let envelope = registry.dispatch(name, args).await;
        assert!(envelope.is_error(), "{name} should fail with no page");
        assert_eq!(
            envelope.error.as_deref(),
            Some("NoActiveSession"),
            "wrong error for {name}"
        );
    }

    assert!(!session.is_running().await);
}

#[tokio::test]
async fn close_browser_is_idempotent_through_the_registry() {
    let (_session, registry) = registry();

    let first = registry.dispatch("close_browser", json!({})).await;
    let second = registry.dispatch("close_browser", json!({})).await;

    assert!(!first.is_error());
    assert!(!second.is_error(), "second close must be a no-op success");
}

#[tokio::test]
async fn page_actions_after_close_report_no_active_session() {
    let (_session, registry) = registry();

    let closed = registry.dispatch("close_browser", json!({})).await;
    assert!(!closed.is_error());

    // No stale handle: the failure is the modeled NoActiveSession error
    let envelope = registry.dispatch("get_page_text", json!({})).await;
    assert!(envelope.is_error());
    assert_eq!(envelope.error.as_deref(), Some("NoActiveSession"));
}

#[tokio::test]
async fn screenshot_capture_modes_are_mutually_exclusive() {
    let (_session, registry) = registry();

    let envelope = registry
        .dispatch(
            "take_screenshot",
            json!({"full_page": true, "element_selector": "#chart"}),
        )
        .await;

    assert!(envelope.is_error());
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));
}

#[tokio::test]
async fn extract_rejects_malformed_attribute_lists() {
    let (_session, registry) = registry();

    let envelope = registry
        .dispatch(
            "extract_elements",
            json!({"selector": "a", "attributes": ["text", "on click"]}),
        )
        .await;
    assert!(envelope.is_error());
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));

    let envelope = registry
        .dispatch("extract_elements", json!({"selector": "a", "attributes": []}))
        .await;
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));
}

#[tokio::test]
async fn search_validates_query_and_result_count() {
    let (session, registry) = registry();

    let envelope = registry.dispatch("search_google", json!({"query": ""})).await;
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));

    let envelope = registry
        .dispatch("search_google", json!({"query": "rust", "num_results": 100}))
        .await;
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));

    assert!(!session.is_running().await);
}

#[tokio::test]
async fn error_envelopes_match_the_documented_shape() {
    let (_session, registry) = registry();

    let envelope = registry.dispatch("get_page_text", json!({})).await;
    let value = envelope_json(&envelope);

    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "NoActiveSession");
    assert!(value["message"].is_string());
    assert!(value.get("data").is_none(), "error envelopes carry no data");
    assert!(value.get("image").is_none());
}

#[tokio::test]
async fn success_envelopes_match_the_documented_shape() {
    let (_session, registry) = registry();

    let envelope = registry.dispatch("close_browser", json!({})).await;
    let value = envelope_json(&envelope);

    assert_eq!(value["status"], "success");
    assert!(value["message"].is_string());
    assert!(value.get("error").is_none());
}

#[tokio::test]
async fn unknown_action_is_an_error_envelope() {
    let (_session, registry) = registry();

    let envelope = registry.dispatch("open_tab", json!({})).await;
    assert!(envelope.is_error());
    assert!(envelope.message.contains("open_tab"));
}

#[tokio::test]
async fn timeouts_are_validated_per_action_class() {
    let (_session, registry) = registry();

    // Interaction class caps at 30s
    let envelope = registry
        .dispatch(
            "click_element",
            json!({"selector": "#go", "timeout_ms": 31_000}),
        )
        .await;
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));

    // Navigation class caps at 5min
    let envelope = registry
        .dispatch(
            "navigate_to_url",
            json!({"url": "https://example.com", "timeout_ms": 301_000}),
        )
        .await;
    assert_eq!(envelope.error.as_deref(), Some("InvalidParameter"));
}
