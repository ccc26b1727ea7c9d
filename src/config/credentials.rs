//! Credentials for the external APIs.
//!
//! Credentials are resolved once at startup into an explicit [`Credentials`]
//! value and handed to each tool when it is constructed. Tools never read
//! the process environment themselves.

use super::Settings;
use crate::error::{ErrandError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Google Custom Search API key and search engine ID.
#[derive(Clone, PartialEq)]
pub struct SearchCredentials {
    pub api_key: String,
    pub cx: String,
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"<redacted>")
            .field("cx", &self.cx)
            .finish()
    }
}

/// OAuth client plus a refresh token for one set of scopes.
#[derive(Clone, PartialEq, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Token endpoint override; `google.token_uri` is used when absent.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl OAuthCredentials {
    /// Load a Google "authorized user" JSON file (`token.json`).
    pub fn from_authorized_user_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let creds: OAuthCredentials = serde_json::from_str(&content)?;

        if creds.client_id.is_empty()
            || creds.client_secret.is_empty()
            || creds.refresh_token.is_empty()
        {
            return Err(ErrandError::Config(format!(
                "{} is missing client_id, client_secret or refresh_token",
                path.display()
            )));
        }
        Ok(creds)
    }
}

/// All credentials the tools may need. Absent entries disable the
/// corresponding tools at call time.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub search: Option<SearchCredentials>,
    pub gmail: Option<OAuthCredentials>,
    pub calendar: Option<OAuthCredentials>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("search", &self.search)
            .field("gmail", &self.gmail)
            .field("calendar", &self.calendar)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let search = match (var("GOOGLE_API_KEY"), var("GOOGLE_CSE_CX")) {
            (Some(api_key), Some(cx)) => Some(SearchCredentials { api_key, cx }),
            _ => None,
        };

        let oauth = |refresh_var: &str| match (
            var("GOOGLE_CLIENT_ID"),
            var("GOOGLE_CLIENT_SECRET"),
            var(refresh_var),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Some(OAuthCredentials {
                client_id,
                client_secret,
                refresh_token,
                token_uri: None,
            }),
            _ => None,
        };

        Self {
            openai_api_key: var("OPENAI_API_KEY"),
            search,
            gmail: oauth("GMAIL_REFRESH_TOKEN"),
            calendar: oauth("CALENDAR_REFRESH_TOKEN"),
        }
    }

    /// Read the environment, then fall back to the configured Gmail token
    /// file when the environment has no Gmail credentials.
    pub fn resolve(settings: &Settings) -> Self {
        Self::from_env().with_token_file_fallback(settings)
    }

    fn with_token_file_fallback(mut self, settings: &Settings) -> Self {
        if self.gmail.is_some() {
            return self;
        }
        let Some(path) = settings.gmail_token_file() else {
            return self;
        };

        match OAuthCredentials::from_authorized_user_file(&path) {
            Ok(creds) => {
                debug!("Loaded Gmail credentials from {}", path.display());
                self.gmail = Some(creds);
            }
            Err(e) => warn!("Ignoring Gmail token file {}: {}", path.display(), e),
        }
        self
    }
}
