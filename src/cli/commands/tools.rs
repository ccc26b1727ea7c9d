//! Tools command: list what the agent can call.

use super::build_registry;
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use anyhow::Result;

pub fn run_tools(settings: &Settings, credentials: &Credentials) -> Result<()> {
    let registry = build_registry(settings, credentials)?;

    Output::header(&format!("Tools ({})", registry.len()));
    for tool in registry.tools() {
        Output::tool(tool.name(), tool.description());
    }
    println!();

    Ok(())
}
