//! Stdio MCP server
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout. Every `tools/call`
//! resolves through the action registry and returns the response envelope
//! as a single text content block; action failures become error envelopes,
//! never JSON-RPC faults. Logging goes to stderr, since stdout carries the
//! protocol.

pub mod protocol;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::actions::ActionRegistry;
use protocol::{
    INVALID_PARAMS, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION, ToolCallParams, ToolDef,
};

pub struct McpServer {
    registry: ActionRegistry,
}

impl McpServer {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    pub fn tool_defs(&self) -> Vec<ToolDef> {
        self.registry
            .iter()
            .map(|action| ToolDef {
                name: action.name().to_string(),
                description: action.description().to_string(),
                input_schema: action.input_schema(),
            })
            .collect()
    }

    /// Handle one request. Returns `None` for notifications.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone()?;

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),

            "ping" => JsonRpcResponse::success(id, json!({})),

            "tools/list" => JsonRpcResponse::success(id, json!({"tools": self.tool_defs()})),

            "tools/call" => {
                let raw = match request.params {
                    Some(raw) => raw,
                    None => {
                        return Some(JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            "tools/call requires params",
                        ));
                    }
                };
                let params: ToolCallParams = match serde_json::from_value(raw) {
                    Ok(params) => params,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("invalid tools/call params: {}", e),
                        ));
                    }
                };

                debug!(tool = %params.name, "dispatching tool call");
                let envelope = self.registry.dispatch(&params.name, params.arguments).await;

                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": envelope.to_json()}],
                        "isError": envelope.is_error(),
                    }),
                )
            }

            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("method '{}' not found", other),
            ),
        };

        Some(response)
    }

    /// Serve line-delimited JSON-RPC on stdin/stdout until EOF.
    pub async fn serve_stdio(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        info!("MCP server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle(request).await,
                Err(e) => {
                    warn!(error = %e, "unparseable request line");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                let serialized = serde_json::to_string(&response)?;
                stdout.write_all(serialized.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, MCP server shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BrowserSession;
    use crate::{Config, Status};
    use std::sync::Arc;

    fn server() -> McpServer {
        let session = Arc::new(BrowserSession::new(Config::default()));
        McpServer::new(ActionRegistry::with_default_actions(session))
    }

    fn request(json: &str) -> JsonRpcRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let resp = server()
            .handle(request(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            ))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "webpilot");
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let resp = server()
            .handle(request(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            ))
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn tools_list_exposes_all_actions() {
        let resp = server()
            .handle(request(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 12);
        assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
        assert!(
            tools
                .iter()
                .any(|t| t["name"] == "navigate_to_url")
        );
    }

    #[tokio::test]
    async fn unknown_method_is_a_json_rpc_error() {
        let resp = server()
            .handle(request(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid() {
        let resp = server()
            .handle(request(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn failed_action_is_an_error_envelope_not_a_fault() {
        let resp = server()
            .handle(request(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_page_text"}}"#,
            ))
            .await
            .unwrap();
        // JSON-RPC level succeeds; the envelope carries the failure
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);

        let envelope: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(envelope["status"], "error");
        assert_eq!(envelope["error"], "NoActiveSession");
    }

    #[tokio::test]
    async fn close_browser_round_trips_without_a_browser() {
        let resp = server()
            .handle(request(
                r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"close_browser","arguments":{}}}"#,
            ))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);

        let envelope: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        let status: Status = serde_json::from_value(envelope["status"].clone()).unwrap();
        assert_eq!(status, Status::Success);
    }
}
