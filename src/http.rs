//! Outbound HTTP transport.
//!
//! Every request to Google goes through the [`Transport`] trait. The
//! production implementation wraps `reqwest`; tests substitute a recording
//! transport so tool behaviour can be checked without a network.

use crate::config::HttpSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A single outbound API request.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<Body>,
}

// Query strings and bodies carry API keys and secrets.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query_params", &self.query.len())
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Authenticate with an OAuth bearer token.
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = Some(Body::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Best human-readable error text: Google's `error.message`, an OAuth
    /// `error_description`, or the start of the body.
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.body) {
            let message = value["error"]["message"]
                .as_str()
                .or_else(|| value["error_description"].as_str())
                .or_else(|| value["error"].as_str());
            if let Some(message) = message {
                return message.to_string();
            }
        }
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            trimmed.chars().take(200).collect()
        }
    }
}

/// Something that can execute API requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the configured timeout.
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            Some(Body::Json(value)) => builder.json(value),
            Some(Body::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory transport for tool tests.

    use super::*;
    use std::sync::Mutex;

    /// Answers requests from a list of `(url fragment, response)` routes and
    /// records every request it sees. Unmatched requests get a 404.
    #[derive(Default)]
    pub struct RecordingTransport {
        routes: Vec<(Method, String, ApiResponse)>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, method: Method, fragment: &str, status: u16, body: &str) -> Self {
            self.routes
                .push((method, fragment.to_string(), ApiResponse::new(status, body)));
            self
        }

        /// Route the OAuth token endpoint to a successful exchange.
        pub fn with_token(self) -> Self {
            self.route(
                Method::Post,
                "oauth2.googleapis.com/token",
                200,
                r#"{"access_token": "ya29.test", "expires_in": 3599, "token_type": "Bearer"}"#,
            )
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Requests whose URL contains `fragment`.
        pub fn matching(&self, fragment: &str) -> Vec<ApiRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.url.contains(fragment))
                .collect()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request.clone());
            let response = self
                .routes
                .iter()
                .find(|(method, fragment, _)| *method == request.method && request.url.contains(fragment))
                .map(|(_, _, response)| response.clone())
                .unwrap_or_else(|| ApiResponse::new(404, r#"{"error": {"message": "Not Found"}}"#));
            Ok(response)
        }
    }
}
