//! Gmail REST API: list, read and send messages.

use super::{decode, endpoint, execute};
use crate::error::ToolError;
use crate::http::{ApiRequest, Transport};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub payload: Payload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Message {
    /// First header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub id: String,
}

/// Gmail client bound to one access token, acting as the token's owner.
pub struct Gmail<'a> {
    transport: &'a dyn Transport,
    base: &'a str,
    access_token: &'a str,
}

impl<'a> Gmail<'a> {
    pub fn new(transport: &'a dyn Transport, base: &'a str, access_token: &'a str) -> Self {
        Self {
            transport,
            base,
            access_token,
        }
    }

    /// List message IDs matching a Gmail search query.
    #[instrument(skip(self))]
    pub async fn list_messages(&self, query: &str, max_results: u32) -> Result<MessageList, ToolError> {
        let url = endpoint(self.base, &["users", "me", "messages"])?;
        let mut request = ApiRequest::get(url)
            .bearer(self.access_token)
            .query("maxResults", max_results);
        if !query.is_empty() {
            request = request.query("q", query);
        }

        let response = execute(self.transport, request, "Gmail list").await?;
        decode(&response, "Gmail list")
    }

    /// Fetch a message's snippet plus its Subject and From headers.
    #[instrument(skip(self))]
    pub async fn get_message(&self, id: &str) -> Result<Message, ToolError> {
        let url = endpoint(self.base, &["users", "me", "messages", id])?;
        let request = ApiRequest::get(url)
            .bearer(self.access_token)
            .query("format", "metadata")
            .query("metadataHeaders", "Subject")
            .query("metadataHeaders", "From");

        let response = execute(self.transport, request, "Gmail get").await?;
        decode(&response, "Gmail get")
    }

    /// Send an RFC 2822 message already encoded with [`encode_raw`].
    #[instrument(skip(self, raw))]
    pub async fn send(&self, raw: &str) -> Result<SentMessage, ToolError> {
        let url = endpoint(self.base, &["users", "me", "messages", "send"])?;
        let request = ApiRequest::post(url)
            .bearer(self.access_token)
            .json(json!({ "raw": raw }));

        let response = execute(self.transport, request, "Gmail send").await?;
        let sent: SentMessage = decode(&response, "Gmail send")?;
        debug!("Gmail accepted message {}", sent.id);
        Ok(sent)
    }
}

/// Build a single-part `text/plain` MIME message.
///
/// ASCII bodies go out as 7bit; anything else is UTF-8 in base64. Non-ASCII
/// subjects use an RFC 2047 encoded word.
pub fn build_mime_message(to: &str, subject: &str, body: &str) -> Result<String, ToolError> {
    for (name, value) in [("to", to), ("subject", subject)] {
        if value.contains(['\r', '\n']) {
            return Err(ToolError::Validation(format!(
                "Invalid input data! The '{}' field must not contain line breaks.",
                name
            )));
        }
    }

    let (encoding, content) = if body.is_ascii() {
        ("7bit", body.replace("\r\n", "\n").replace('\n', "\r\n"))
    } else {
        ("base64", wrap_base64(&STANDARD.encode(body.as_bytes())))
    };

    Ok(format!(
        "Content-Type: text/plain; charset=\"utf-8\"\r\n\
         MIME-Version: 1.0\r\n\
         Content-Transfer-Encoding: {}\r\n\
         to: {}\r\n\
         subject: {}\r\n\
         \r\n\
         {}",
        encoding,
        to,
        encode_header(subject),
        content
    ))
}

/// Encode a message for the `raw` field of the send request.
pub fn encode_raw(message: &str) -> String {
    URL_SAFE.encode(message.as_bytes())
}

fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(76)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}
