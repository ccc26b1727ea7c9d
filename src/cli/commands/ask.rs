//! Ask command implementation.

use super::build_registry;
use crate::agent::Agent;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::openai::create_client;
use anyhow::Result;
use std::time::Duration;

/// Run the ask command.
pub async fn run_ask(
    request: Option<String>,
    model: Option<String>,
    mut settings: Settings,
    credentials: Credentials,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &credentials) {
        Output::error(&format!("{}", e));
        Output::info("Run 'errand doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.agent.model = model;
    }
    let request = request.unwrap_or_else(|| settings.agent.default_request.clone());

    let registry = build_registry(&settings, &credentials)?;
    let client = create_client(
        credentials.openai_api_key.as_deref(),
        Duration::from_secs(settings.http.timeout_secs),
    )?;
    let agent = Agent::new(registry, &settings.agent, client);

    Output::info(&format!("Request: {}", request));
    let spinner = Output::spinner(&format!("Working ({})...", agent.model()));

    match agent.run(&request).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    let line = format!("{} {}", call.name, truncate(&call.arguments, 60));
                    if call.is_error {
                        Output::warning(&format!("{} -> {}", line, truncate(&call.result, 80)));
                    } else {
                        Output::info(&line);
                    }
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
