//! Call command: invoke one tool without the model.

use super::build_registry;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use anyhow::{bail, Result};

/// Run a single tool and print its output.
pub async fn run_call(
    tool: &str,
    input: &str,
    settings: Settings,
    credentials: Credentials,
) -> Result<()> {
    preflight::check(Operation::Call, &credentials)?;
    let registry = build_registry(&settings, &credentials)?;

    if registry.get(tool).is_none() {
        Output::error(&format!("Unknown tool: {}", tool));
        Output::info("Run 'errand tools' to list available tools.");
        bail!("unknown tool '{}'", tool);
    }

    match registry.call(tool, input).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            println!("{}", e);
            if e.is_retryable() {
                Output::warning("The upstream service may be temporarily unavailable; try again later.");
            }
            bail!("tool '{}' failed", tool)
        }
    }
}
