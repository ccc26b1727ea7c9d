//! Tools the agent can call.
//!
//! Every tool takes a single string and returns a string. Failures come back
//! as [`ToolError`] so callers can tell configuration problems, bad input and
//! upstream outages apart; the agent loop renders them to text for the model.

mod calculator;
mod calendar;
mod gmail;
mod web_search;

pub use calculator::Calculator;
pub use calendar::{GoogleCalendarCreateEvent, GoogleCalendarListEvents};
pub use gmail::{GmailGetEmails, GmailSendEmail};
pub use web_search::WebSearch;

use crate::config::{Credentials, Settings};
use crate::error::ToolError;
use crate::http::Transport;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A named function exposed to the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool.
    fn name(&self) -> &str;

    /// When to use the tool.
    fn description(&self) -> &str;

    /// What the single `input` argument should contain.
    fn input_description(&self) -> &str;

    /// Run the tool. Side effects happen at most once per call.
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

/// Ordered, immutable set of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard tool set, in the order the agent sees it.
    pub fn standard(
        settings: &Settings,
        credentials: &Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Calculator));
        registry.register(Arc::new(WebSearch::new(
            transport.clone(),
            settings.search.clone(),
            credentials.search.clone(),
        )));
        registry.register(Arc::new(GmailGetEmails::new(
            transport.clone(),
            settings.google.clone(),
            credentials.gmail.clone(),
        )));
        registry.register(Arc::new(GoogleCalendarListEvents::new(
            transport.clone(),
            settings.google.clone(),
            credentials.calendar.clone(),
        )));
        registry.register(Arc::new(GmailSendEmail::new(
            transport.clone(),
            settings.google.clone(),
            credentials.gmail.clone(),
        )));
        registry.register(Arc::new(GoogleCalendarCreateEvent::new(
            transport,
            settings.google.clone(),
            credentials.calendar.clone(),
        )));
        registry
    }

    /// Add a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => {
                warn!("Replacing tool {}", tool.name());
                self.tools[index] = tool;
            }
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// OpenAI function definitions for every tool.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .iter()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: Some(json!({
                        "type": "object",
                        "properties": {
                            "input": {
                                "type": "string",
                                "description": tool.input_description()
                            }
                        },
                        "required": ["input"]
                    })),
                    strict: None,
                },
            })
            .collect()
    }

    /// Invoke a tool with its raw string input.
    pub async fn call(&self, name: &str, input: &str) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::Validation(format!("Unknown tool: {}", name)))?;

        info!("Calling tool {}", name);
        debug!("Tool {} input: {}", name, input);

        let result = tool.invoke(input).await;
        if let Err(e) = &result {
            warn!("Tool {} failed: {}", name, e);
        }
        result
    }

    /// Invoke a tool with model-supplied JSON arguments.
    pub async fn invoke(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let input = extract_input(arguments);
        self.call(name, &input).await
    }
}

/// Pull the tool input out of a model's function-call arguments.
///
/// `{"input": "..."}` yields the string; a non-string `input` is re-encoded
/// as JSON. Arguments without an `input` key, or that are not JSON at all,
/// are passed through whole.
pub fn extract_input(arguments: &str) -> String {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => match map.get("input") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => arguments.to_string(),
        },
        _ => arguments.to_string(),
    }
}

/// A non-empty string field of a JSON object.
pub(crate) fn string_field<'a>(fields: &'a Value, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::RecordingTransport;

    fn registry() -> ToolRegistry {
        ToolRegistry::standard(
            &Settings::default(),
            &Credentials::default(),
            Arc::new(RecordingTransport::new()),
        )
    }

    #[test]
    fn test_standard_order() {
        let names: Vec<_> = registry().tools().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Calculator",
                "webSearch",
                "gmailGetEmails",
                "GoogleCalendarListEvents",
                "gmailSendEmail",
                "GoogleCalendarCreateEvent",
            ]
        );
    }

    #[test]
    fn test_definitions_expose_single_input() {
        let definitions = registry().definitions();
        assert_eq!(definitions.len(), 6);
        for definition in &definitions {
            let params = definition.function.parameters.as_ref().unwrap();
            assert_eq!(params["required"], json!(["input"]));
            assert_eq!(params["properties"]["input"]["type"], "string");
            assert!(definition.function.description.is_some());
        }
    }

    #[test]
    fn test_extract_input() {
        assert_eq!(extract_input(r#"{"input": "2 + 2"}"#), "2 + 2");
        assert_eq!(
            extract_input(r#"{"input": {"to": "a@b.com"}}"#),
            r#"{"to":"a@b.com"}"#
        );
        assert_eq!(
            extract_input(r#"{"to": "a@b.com", "subject": "S"}"#),
            r#"{"to": "a@b.com", "subject": "S"}"#
        );
        assert_eq!(extract_input("label:unread"), "label:unread");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry().invoke("deleteEverything", "{}").await.unwrap_err();
        assert_eq!(err, ToolError::Validation("Unknown tool: deleteEverything".to_string()));
    }

    #[tokio::test]
    async fn test_invoke_routes_to_tool() {
        let result = registry()
            .invoke("Calculator", r#"{"input": "6 * 7"}"#)
            .await
            .unwrap();
        assert_eq!(result, "42");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Calculator));
        registry.register(Arc::new(Calculator));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_string_field() {
        let fields = json!({"to": "a@b.com", "subject": "  ", "n": 5});
        assert_eq!(string_field(&fields, "to"), Some("a@b.com"));
        assert_eq!(string_field(&fields, "subject"), None);
        assert_eq!(string_field(&fields, "n"), None);
        assert_eq!(string_field(&fields, "missing"), None);
    }
}
