//! Agent runner with tool calling loop.

use crate::config::AgentSettings;
use crate::error::{ErrandError, Result};
use crate::openai::ChatModel;
use crate::tools::ToolRegistry;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default system prompt for the agent.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a personal assistant with access to web search, Gmail, Google Calendar and a calculator.

Answer the user's request, calling tools when you need facts or need to act.
Each tool takes a single string argument named "input".

Guidelines:
- Use 'Calculator' for any arithmetic instead of computing it yourself
- Use 'webSearch' for current events and facts you are unsure about
- Use 'gmailGetEmails' and 'GoogleCalendarListEvents' to look things up before answering
- 'gmailSendEmail' and 'GoogleCalendarCreateEvent' act immediately; call each at most once per request
- If a tool returns an error, explain it to the user rather than retrying blindly

When you have what you need, give a short, direct final answer."#;

/// Agent that answers a request by calling tools from a [`ToolRegistry`].
pub struct Agent {
    model_client: Arc<dyn ChatModel>,
    model: String,
    temperature: f32,
    tools: ToolRegistry,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create an agent from settings and a chat model, usually an OpenAI client.
    pub fn new(
        tools: ToolRegistry,
        settings: &AgentSettings,
        model_client: impl ChatModel + 'static,
    ) -> Self {
        Self {
            model_client: Arc::new(model_client),
            model: settings.model.clone(),
            temperature: settings.temperature,
            tools,
            max_iterations: settings.max_iterations.max(1),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the agent on a user request.
    #[instrument(skip(self))]
    pub async fn run(&self, request: &str) -> Result<AgentResponse> {
        let mut messages = self.initial_messages(request)?;
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(ErrandError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let response = self
                .model_client
                .complete(self.completion_request(&messages)?)
                .await?;

            let choice = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ErrandError::Agent("No response from model".to_string()))?;

            let tool_calls = match choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    return Ok(AgentResponse {
                        content: choice.message.content.unwrap_or_default(),
                        tool_calls: tool_calls_made,
                        iterations,
                    })
                }
            };

            messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| ErrandError::Agent(e.to_string()))?
                    .into(),
            );

            for tool_call in &tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                messages.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| ErrandError::Agent(e.to_string()))?
                        .into(),
                );

                tool_calls_made.push(record);
            }
        }
    }

    fn initial_messages(&self, request: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| ErrandError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request)
                .build()
                .map_err(|e| ErrandError::Agent(e.to_string()))?
                .into(),
        ])
    }

    fn completion_request(
        &self,
        messages: &[ChatCompletionRequestMessage],
    ) -> Result<CreateChatCompletionRequest> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(messages.to_vec())
            .tools(self.tools.definitions())
            .build()
            .map_err(|e| ErrandError::Agent(e.to_string()))
    }

    /// Execute a single tool call. Tool failures become the result text.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let (result, is_error) = match self.tools.invoke(name, arguments).await {
            Ok(output) => (output, false),
            Err(e) => (e.to_string(), true),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
            is_error,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Tool output, or the rendered error.
    pub result: String,
    pub is_error: bool,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
