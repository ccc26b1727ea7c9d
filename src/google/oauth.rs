//! OAuth refresh-token exchange.

use super::{decode, execute};
use crate::config::OAuthCredentials;
use crate::error::ToolError;
use crate::http::{ApiRequest, Transport};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a refresh token for a short-lived access token.
///
/// Tokens are not cached: every tool call pays one exchange.
#[instrument(skip_all)]
pub async fn access_token(
    transport: &dyn Transport,
    credentials: &OAuthCredentials,
    default_token_uri: &str,
) -> Result<String, ToolError> {
    let token_uri = credentials
        .token_uri
        .as_deref()
        .filter(|uri| !uri.is_empty())
        .unwrap_or(default_token_uri);

    let request = ApiRequest::post(token_uri).form(&[
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("refresh_token", credentials.refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ]);

    let response = execute(transport, request, "Token refresh").await?;
    let token: TokenResponse = decode(&response, "Token refresh")?;
    debug!("Obtained access token from {}", token_uri);
    Ok(token.access_token)
}
