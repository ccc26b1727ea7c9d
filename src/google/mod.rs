//! Thin typed clients for the Google REST APIs used by the tools.
//!
//! Each function issues requests through a [`Transport`] and maps failures
//! to [`ToolError`]: transport failures and non-2xx statuses become
//! `Upstream`, bad configuration becomes `Configuration`.

pub mod calendar;
pub mod gmail;
pub mod oauth;
pub mod search;

pub use calendar::{Calendar, Event, EventList, EventTime};
pub use gmail::{build_mime_message, encode_raw, Gmail, Message, MessageList, SentMessage};
pub use oauth::access_token;
pub use search::{search, SearchItem, SearchResponse};

use crate::error::ToolError;
use crate::http::{ApiRequest, ApiResponse, Transport};
use serde::de::DeserializeOwned;
use url::Url;

/// Send a request and require a 2xx response.
pub(crate) async fn execute(
    transport: &dyn Transport,
    request: ApiRequest,
    context: &str,
) -> Result<ApiResponse, ToolError> {
    let response = transport
        .send(request)
        .await
        .map_err(|e| ToolError::upstream(format!("{} request failed: {}", context, e)))?;

    if !response.is_success() {
        return Err(ToolError::status(
            response.status,
            format!(
                "{} failed with status {}: {}",
                context,
                response.status,
                response.error_message()
            ),
        ));
    }
    Ok(response)
}

/// Decode a JSON response body.
pub(crate) fn decode<T: DeserializeOwned>(
    response: &ApiResponse,
    context: &str,
) -> Result<T, ToolError> {
    response
        .json()
        .map_err(|e| ToolError::upstream(format!("{} returned an unexpected response: {}", context, e)))
}

/// Join path segments onto an API base URL, percent-encoding each segment.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<String, ToolError> {
    let mut url = Url::parse(base)
        .map_err(|e| ToolError::Configuration(format!("Invalid API base URL '{}': {}", base, e)))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ToolError::Configuration(format!("API base URL '{}' cannot take a path", base)))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url.to_string())
}
