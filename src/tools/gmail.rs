//! Gmail tools: list recent emails and send an email.

use super::{string_field, Tool};
use crate::config::{GoogleSettings, OAuthCredentials};
use crate::error::ToolError;
use crate::google::{access_token, build_mime_message, encode_raw, Gmail};
use crate::http::Transport;
use crate::normalize::coerce_to_valid_json;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const MISSING_CREDENTIALS: &str =
    "Missing one or more Gmail OAuth credentials in environment variables!";

const INVALID_EMAIL_INPUT: &str =
    "Invalid input data! Ensure 'to', 'subject', and 'body' fields are provided.";

/// Shared Gmail access for both tools.
struct GmailAccess {
    transport: Arc<dyn Transport>,
    settings: GoogleSettings,
    credentials: Option<OAuthCredentials>,
}

impl GmailAccess {
    fn credentials(&self) -> Result<&OAuthCredentials, ToolError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ToolError::Configuration(MISSING_CREDENTIALS.to_string()))
    }

    async fn token(&self, credentials: &OAuthCredentials) -> Result<String, ToolError> {
        access_token(self.transport.as_ref(), credentials, &self.settings.token_uri).await
    }
}

/// Lists up to `google.max_results` emails matching a Gmail query.
pub struct GmailGetEmails {
    access: GmailAccess,
}

impl GmailGetEmails {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: GoogleSettings,
        credentials: Option<OAuthCredentials>,
    ) -> Self {
        Self {
            access: GmailAccess {
                transport,
                settings,
                credentials,
            },
        }
    }
}

#[async_trait]
impl Tool for GmailGetEmails {
    fn name(&self) -> &str {
        "gmailGetEmails"
    }

    fn description(&self) -> &str {
        "Retrieves up to 5 recent emails from Gmail based on a search query."
    }

    fn input_description(&self) -> &str {
        "Gmail search syntax, e.g. \"label:unread\" or \"subject:Invoice\"; empty for all mail"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let credentials = self.access.credentials()?;
        let token = self.access.token(credentials).await?;
        let settings = &self.access.settings;
        let gmail = Gmail::new(self.access.transport.as_ref(), &settings.gmail_api_base, &token);

        let list = gmail.list_messages(input.trim(), settings.max_results).await?;
        if list.messages.is_empty() {
            return Ok("No emails found for the given query.".to_string());
        }

        let mut summaries = Vec::with_capacity(list.messages.len());
        for reference in &list.messages {
            let message = gmail.get_message(&reference.id).await?;
            summaries.push(format!(
                "From: {}\nSubject: {}\nSnippet: {}\n",
                message.header("From").unwrap_or("Unknown Sender"),
                message.header("Subject").unwrap_or("No Subject"),
                message.snippet
            ));
        }

        Ok(summaries.join("\n"))
    }
}

/// Sends a plain-text email.
pub struct GmailSendEmail {
    access: GmailAccess,
}

impl GmailSendEmail {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: GoogleSettings,
        credentials: Option<OAuthCredentials>,
    ) -> Self {
        Self {
            access: GmailAccess {
                transport,
                settings,
                credentials,
            },
        }
    }
}

/// Recipients may be a single string or a list of addresses.
fn recipients(fields: &Value) -> Option<String> {
    match fields.get("to") {
        Some(Value::Array(items)) => {
            let addresses: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!addresses.is_empty()).then(|| addresses.join(", "))
        }
        _ => string_field(fields, "to").map(str::to_string),
    }
}

#[async_trait]
impl Tool for GmailSendEmail {
    fn name(&self) -> &str {
        "gmailSendEmail"
    }

    fn description(&self) -> &str {
        "Sends an email using Gmail API. Every call sends a new email."
    }

    fn input_description(&self) -> &str {
        "A JSON object with 'to', 'subject' and 'body' fields, e.g. \
         {\"to\": \"recipient@example.com\", \"subject\": \"Meeting Reminder\", \"body\": \"See you at 10.\"}"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let credentials = self.access.credentials()?;

        let normalized = coerce_to_valid_json(input);
        let fields: Value = serde_json::from_str(&normalized).map_err(|e| {
            ToolError::Validation(format!("Error: email input is not a JSON object: {}", e))
        })?;

        let (Some(to), Some(subject), Some(body)) = (
            recipients(&fields),
            string_field(&fields, "subject"),
            string_field(&fields, "body"),
        ) else {
            return Err(ToolError::Validation(INVALID_EMAIL_INPUT.to_string()));
        };

        let raw = encode_raw(&build_mime_message(&to, subject, body)?);

        let token = self.access.token(credentials).await?;
        let gmail = Gmail::new(
            self.access.transport.as_ref(),
            &self.access.settings.gmail_api_base,
            &token,
        );
        let sent = gmail.send(&raw).await?;

        info!("Sent email to {} ({})", to, sent.id);
        Ok(format!("Email sent successfully! Message ID: {}", sent.id))
    }
}
