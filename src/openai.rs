//! OpenAI client construction and the chat-completion seam used by the agent.

use crate::error::{ErrandError, Result};
use async_openai::types::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::time::Duration;

/// Something that answers chat-completion requests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse>;
}

#[async_trait]
impl ChatModel for Client<OpenAIConfig> {
    async fn complete(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse> {
        self.chat()
            .create(request)
            .await
            .map_err(|e| ErrandError::OpenAI(format!("Agent API error: {}", e)))
    }
}

/// Create an OpenAI client with the given request timeout.
///
/// Without an explicit key, `async-openai` falls back to `OPENAI_API_KEY`.
pub fn create_client(api_key: Option<&str>, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ErrandError::OpenAI(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::Config;

    #[test]
    fn test_explicit_key_is_used() {
        let client = create_client(Some("sk-test"), Duration::from_secs(5)).unwrap();
        let headers = client.config().headers();
        let auth = headers.get("authorization").unwrap().to_str().unwrap();
        assert_eq!(auth, "Bearer sk-test");
    }
}
