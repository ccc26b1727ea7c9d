//! Pre-flight checks before talking to the model.
//!
//! Validates configuration up front so a request fails fast instead of
//! after the first API round trip.

use crate::config::Credentials;
use crate::error::{ErrandError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Running the agent requires an OpenAI key.
    Ask,
    /// Calling a tool directly needs nothing up front; tools check their own credentials.
    Call,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, credentials: &Credentials) -> Result<()> {
    match operation {
        Operation::Ask => check_api_key(credentials),
        Operation::Call => Ok(()),
    }
}

fn check_api_key(credentials: &Credentials) -> Result<()> {
    match credentials.openai_api_key {
        Some(_) => Ok(()),
        None => Err(ErrandError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' or add it to .env"
                .to_string(),
        )),
    }
}
