//! Extraction action: structured data from all elements matching a selector

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{Action, parse_args, schema_value};
use crate::envelope::ActionOutput;
use crate::error::ActionError;
use crate::session::BrowserSession;
use crate::utils::constants::MAX_EXTRACT_ELEMENTS;

fn default_attributes() -> Vec<String> {
    vec!["text".to_string(), "href".to_string()]
}

fn default_max_elements() -> usize {
    10
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractElementsArgs {
    /// CSS selector to find elements (e.g. 'a.product-link', 'div.search-result')
    pub selector: String,

    /// Attributes to extract per element: 'text' (inner text), 'html'
    /// (inner HTML), or any DOM attribute name ('href', 'src', 'data-id', ...)
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,

    /// Maximum number of matching elements to extract (1-100)
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,
}

/// Reject empty or malformed attribute names before touching the DOM.
pub(crate) fn validate_attributes(attributes: &[String]) -> Result<(), ActionError> {
    if attributes.is_empty() {
        return Err(ActionError::InvalidParameter(
            "attributes cannot be empty".to_string(),
        ));
    }

    for attr in attributes {
        if attr.is_empty()
            || !attr
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ActionError::InvalidParameter(format!(
                "invalid attribute name '{}': expected 'text', 'html', or a DOM attribute \
                 ([A-Za-z0-9_-])",
                attr
            )));
        }
    }

    Ok(())
}

pub struct ExtractElementsAction {
    session: Arc<BrowserSession>,
}

impl ExtractElementsAction {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl Action for ExtractElementsAction {
    fn name(&self) -> &'static str {
        "extract_elements"
    }

    fn description(&self) -> &'static str {
        "Extract data from all elements matching a CSS selector. Returns one \
         record per element with the requested attributes; zero matches is an \
         empty result, not an error.\n\n\
         Example: extract_elements({\"selector\": \"article.post\", \
         \"attributes\": [\"text\", \"href\", \"data-id\"], \"max_elements\": 5})"
    }

    fn input_schema(&self) -> Value {
        schema_value::<ExtractElementsArgs>()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ActionOutput, ActionError> {
        let args: ExtractElementsArgs = parse_args(args)?;

        if args.selector.trim().is_empty() {
            return Err(ActionError::InvalidParameter(
                "selector cannot be empty".to_string(),
            ));
        }
        validate_attributes(&args.attributes)?;
        if args.max_elements == 0 || args.max_elements > MAX_EXTRACT_ELEMENTS {
            return Err(ActionError::InvalidParameter(format!(
                "max_elements must be in 1..={} (got {})",
                MAX_EXTRACT_ELEMENTS, args.max_elements
            )));
        }

        let page = self.session.require_page().await?;

        // Zero matches surfaces as an error from the CDP layer; both cases
        // are an empty result set here
        let elements = match page.find_elements(&args.selector).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!(selector = %args.selector, error = %e, "selector matched no elements");
                Vec::new()
            }
        };

        let mut records = Vec::new();
        for element in elements.iter().take(args.max_elements) {
            let mut record = Map::new();
            for attr in &args.attributes {
                let value = match attr.as_str() {
                    "text" => element.inner_text().await.ok().flatten(),
                    "html" => element.inner_html().await.ok().flatten(),
                    name => element.attribute(name).await.ok().flatten(),
                };
                record.insert(
                    attr.clone(),
                    value.map(Value::String).unwrap_or(Value::Null),
                );
            }
            records.push(Value::Object(record));
        }

        Ok(ActionOutput::data(
            format!("Extracted {} elements for '{}'", records.len(), args.selector),
            json!({
                "selector": args.selector,
                "count": records.len(),
                "elements": records,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attributes_are_text_and_href() {
        let args: ExtractElementsArgs =
            serde_json::from_value(json!({"selector": "a"})).unwrap();
        assert_eq!(args.attributes, vec!["text", "href"]);
        assert_eq!(args.max_elements, 10);
    }

    #[test]
    fn accepts_text_html_and_dom_attribute_names() {
        let attrs: Vec<String> = ["text", "html", "href", "src", "data-id", "aria-label"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(validate_attributes(&attrs).is_ok());
    }

    #[test]
    fn rejects_empty_attribute_list() {
        let err = validate_attributes(&[]).unwrap_err();
        assert_eq!(err.kind(), "InvalidParameter");
    }

    #[test]
    fn rejects_malformed_attribute_names() {
        for bad in ["", "on click", "style;", "a=b", "data\u{e9}"] {
            let err = validate_attributes(&[bad.to_string()]).unwrap_err();
            assert_eq!(err.kind(), "InvalidParameter", "attr: {bad:?}");
        }
    }

    #[tokio::test]
    async fn out_of_range_max_elements_is_invalid() {
        let session = Arc::new(BrowserSession::new(crate::Config::default()));
        let action = ExtractElementsAction::new(session);

        for max in [0, MAX_EXTRACT_ELEMENTS + 1] {
            let err = action
                .execute(json!({"selector": "a", "max_elements": max}))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "InvalidParameter", "max_elements: {max}");
        }
    }
}
