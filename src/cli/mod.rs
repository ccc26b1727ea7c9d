//! CLI module for Errand.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Errand - a tool-calling assistant for search, Gmail and Google Calendar
///
/// Hands a plain-language request to an OpenAI model that can search the web,
/// read and send email, list and create calendar events, and do arithmetic.
#[derive(Parser, Debug)]
#[command(name = "errand")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ERRAND_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the agent to handle a request
    Ask {
        /// The request, e.g. "Email Sam the agenda for tomorrow"
        request: Option<String>,

        /// OpenAI chat model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Invoke a single tool directly, bypassing the model
    Call {
        /// Tool name, e.g. Calculator or webSearch
        tool: String,

        /// Tool input string
        input: String,
    },

    /// List available tools
    Tools,

    /// Check which credentials and settings are configured
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
