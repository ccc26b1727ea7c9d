//! CLI command implementations.

mod ask;
mod call;
mod config;
mod doctor;
mod tools;

pub use ask::run_ask;
pub use call::run_call;
pub use config::run_config;
pub use doctor::run_doctor;
pub use tools::run_tools;

use crate::config::{Credentials, Settings};
use crate::http::HttpTransport;
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Build the standard tool set over a real HTTP transport.
fn build_registry(settings: &Settings, credentials: &Credentials) -> anyhow::Result<ToolRegistry> {
    let transport = Arc::new(HttpTransport::new(&settings.http)?);
    Ok(ToolRegistry::standard(settings, credentials, transport))
}
