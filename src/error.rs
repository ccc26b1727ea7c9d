//! Error types for Errand.

use thiserror::Error;

/// Library-level error type for Errand operations.
#[derive(Error, Debug)]
pub enum ErrandError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Errand operations.
pub type Result<T> = std::result::Result<T, ErrandError>;

/// Failure of a single tool invocation.
///
/// The `Display` output is what the model sees as the tool result, so each
/// variant renders as a complete human-readable sentence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Required credentials or settings are missing.
    #[error("{0}")]
    Configuration(String),

    /// The tool input was malformed or incomplete.
    #[error("{0}")]
    Validation(String),

    /// The external API failed or could not be reached.
    #[error("Error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl ToolError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ToolError::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ToolError::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolError::Upstream { status: None, .. } => true,
            ToolError::Upstream {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::Validation("Missing required field: end".to_string());
        assert_eq!(err.to_string(), "Missing required field: end");

        let err = ToolError::status(404, "Not Found");
        assert_eq!(err.to_string(), "Error: Not Found");
    }

    #[test]
    fn test_retryable() {
        assert!(ToolError::upstream("connection reset").is_retryable());
        assert!(ToolError::status(503, "unavailable").is_retryable());
        assert!(ToolError::status(429, "slow down").is_retryable());
        assert!(!ToolError::status(400, "bad request").is_retryable());
        assert!(!ToolError::Configuration("missing key".to_string()).is_retryable());
        assert!(!ToolError::Validation("bad input".to_string()).is_retryable());
    }
}
