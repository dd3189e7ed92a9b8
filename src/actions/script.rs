//! Script evaluation action: arbitrary JavaScript in the page context

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteJavascriptArgs {
    /// JavaScript expression to evaluate in the page context
    pub script: String,
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub struct ExecuteJavascriptAction {
    session: Arc<BrowserSession>,
}

impl ExecuteJavascriptAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for ExecuteJavascriptAction {
    fn name(&self) -> &'static str {
        "execute_javascript"
    }

    fn description(&self) -> &'static str {
        "Evaluate a JavaScript expression in the page context and return its \
         result, best-effort serialized to JSON. The script has full DOM \
         access.\n\n\
         Example: execute_javascript({\"script\": \"document.querySelectorAll('a').length\"})\n\
         Example: execute_javascript({\"script\": \"({title: document.title, url: location.href})\"})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<ExecuteJavascriptArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: ExecuteJavascriptArgs = parse_args(args)?;

        if args.script.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "script cannot be empty".to_string(),
            ));
        }

        let page = self.session.require_page().await?;

        // An unhandled exception inside the evaluated code surfaces as an
        // evaluation error from the CDP layer
        let eval_result = page
            .evaluate(args.script.as_str())
            .await
            .map_err(|e| ActionError::Script(e.to_string()))?;

        // Values the protocol cannot serialize (functions, DOM nodes,
        // undefined) come back as null
        let result = eval_result.into_value().unwrap_or(Value::Null);
        let result_type = json_type_name(&result);

        Ok(ActionOutput::data(
            format!("Script evaluated ({})", result_type),
            json!({
                "result": result,
                "result_type": result_type,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_cover_all_json_shapes() {
        assert_eq!(json_type_name(&Value::Null), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(42)), "number");
        assert_eq!(json_type_name(&json!("hi")), "string");
        assert_eq!(json_type_name(&json!([1, 2])), "array");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }

    #[tokio::test]
    async fn empty_script_is_invalid() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = ExecuteJavascriptAction::new(session);
        let err = action.execute(json!({"script": ""})).await.unwrap_err();
        assert_eq!(err.kind(), "InvalidParameter");
    }
}
