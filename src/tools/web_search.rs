//! Web search via Google Custom Search.

use super::Tool;
use crate::config::{SearchCredentials, SearchSettings};
use crate::error::ToolError;
use crate::google::search;
use crate::http::Transport;
use async_trait::async_trait;
use std::sync::Arc;

pub struct WebSearch {
    transport: Arc<dyn Transport>,
    settings: SearchSettings,
    credentials: Option<SearchCredentials>,
}

impl WebSearch {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: SearchSettings,
        credentials: Option<SearchCredentials>,
    ) -> Self {
        Self {
            transport,
            settings,
            credentials,
        }
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "webSearch"
    }

    fn description(&self) -> &str {
        "Searches the web for a query using Google Custom Search. \
         Returns the title, snippet and link of the top recent result."
    }

    fn input_description(&self) -> &str {
        "The search query"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ToolError::Configuration("Google CSE API key or CX ID is missing".to_string())
        })?;

        let results = search(self.transport.as_ref(), &self.settings, credentials, input).await?;

        let Some(top) = results.items.first() else {
            return Ok("No search results found.".to_string());
        };

        Ok(format!(
            "Title: {}\nSnippet: {}\nLink: {}",
            top.title.as_deref().unwrap_or("No title available"),
            top.snippet.as_deref().unwrap_or("No snippet available"),
            top.link.as_deref().unwrap_or("No link available"),
        ))
    }
}
