//! Normalized action response envelope
//!
//! Every action result crosses the dispatch boundary as
//! `{status, message, data?}`; screenshot captures carry `image` (a base64
//! data URI) instead of `data`, and errors carry the error-kind label.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// What a successful action hands back to the dispatcher.
#[derive(Debug)]
pub enum Payload {
    /// No operation-specific data (scroll, close, ...)
    None,
    /// JSON data payload
    Data(Value),
    /// Base64 data URI (screenshots)
    Image(String),
}

/// Successful action outcome before envelope conversion.
#[derive(Debug)]
pub struct ActionOutput {
    pub message: String,
    pub payload: Payload,
}

impl ActionOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: Payload::None,
        }
    }

    pub fn data(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            payload: Payload::Data(data),
        }
    }

    pub fn image(message: impl Into<String>, data_uri: String) -> Self {
        Self {
            message: message.into(),
            payload: Payload::Image(data_uri),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: Status,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Error-kind label (`ElementNotFound`, `NavigationTimeout`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(output: ActionOutput) -> Self {
        let (data, image) = match output.payload {
            Payload::None => (None, None),
            Payload::Data(value) => (Some(value), None),
            Payload::Image(uri) => (None, Some(uri)),
        };
        Self {
            status: Status::Success,
            message: output.message,
            data,
            image,
            error: None,
        }
    }

    pub fn error(err: &ActionError) -> Self {
        Self {
            status: Status::Error,
            message: err.to_string(),
            data: None,
            image: None,
            error: Some(err.kind().to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"status":"error","message":"envelope serialization failed"}"#.to_string()
        })
    }
}

impl From<Result<ActionOutput, ActionError>> for Envelope {
    fn from(result: Result<ActionOutput, ActionError>) -> Self {
        match result {
            Ok(output) => Envelope::success(output),
            Err(err) => Envelope::error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let env = Envelope::success(ActionOutput::data(
            "Navigated to https://example.com",
            json!({"url": "https://example.com", "title": "Example Domain"}),
        ));
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["title"], "Example Domain");
        assert!(value.get("image").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_kind_and_no_data() {
        let err = ActionError::NavigationTimeout {
            url: "https://unreachable.invalid".into(),
            timeout_ms: 30_000,
        };
        let env = Envelope::error(&err);
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "NavigationTimeout");
        assert!(value.get("data").is_none());
        assert!(value.get("image").is_none());
        assert!(
            value["message"]
                .as_str()
                .unwrap()
                .contains("unreachable.invalid")
        );
    }

    #[test]
    fn screenshot_envelope_uses_image_field() {
        let env = Envelope::success(ActionOutput::image(
            "Screenshot captured",
            "data:image/png;base64,iVBORw0KGgo=".into(),
        ));
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["status"], "success");
        assert!(
            value["image"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
        assert!(value.get("data").is_none());
    }

    #[test]
    fn message_only_output_omits_payload_fields() {
        let env = Envelope::success(ActionOutput::message("Browser closed"));
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.get("data").is_none());
        assert!(value.get("image").is_none());
    }

    #[test]
    fn result_conversion_matches_branch() {
        let ok: Result<ActionOutput, ActionError> = Ok(ActionOutput::message("done"));
        assert!(!Envelope::from(ok).is_error());

        let err: Result<ActionOutput, ActionError> = Err(ActionError::NoActiveSession);
        assert!(Envelope::from(err).is_error());
    }
}
