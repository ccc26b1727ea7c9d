//! Google Custom Search JSON API.

use super::decode;
use crate::config::{SearchCredentials, SearchSettings};
use crate::error::ToolError;
use crate::http::{ApiRequest, Transport};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Search response; only the fields the tools read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

/// Run one search query.
#[instrument(skip(transport, settings, credentials))]
pub async fn search(
    transport: &dyn Transport,
    settings: &SearchSettings,
    credentials: &SearchCredentials,
    query: &str,
) -> Result<SearchResponse, ToolError> {
    let mut request = ApiRequest::get(&settings.endpoint)
        .query("key", &credentials.api_key)
        .query("cx", &credentials.cx)
        .query("q", query);
    if !settings.date_restrict.is_empty() {
        request = request.query("dateRestrict", &settings.date_restrict);
    }

    let response = transport
        .send(request)
        .await
        .map_err(|e| ToolError::upstream(e.to_string()))?;

    if response.status != 200 {
        return Err(ToolError::status(
            response.status,
            format!(
                "Unable to fetch search results. Status Code: {}",
                response.status
            ),
        ));
    }

    let results: SearchResponse = decode(&response, "Search")?;
    debug!("Search returned {} items", results.items.len());
    Ok(results)
}
