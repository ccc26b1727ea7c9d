//! Errand - a tool-calling assistant for search, Gmail and Google Calendar
//!
//! An OpenAI chat model is given six tools and a plain-language request. It
//! decides which tools to call; the tools talk to Google APIs and hand back
//! short human-readable strings.
//!
//! # Overview
//!
//! The tools:
//! - `Calculator` - arithmetic with Python operator semantics
//! - `webSearch` - top recent Google Custom Search result
//! - `gmailGetEmails` / `gmailSendEmail` - read and send mail
//! - `GoogleCalendarListEvents` / `GoogleCalendarCreateEvent` - list and add events
//!
//! # Architecture
//!
//! - `config` - Settings file and credential resolution
//! - `http` - The `Transport` seam every outbound request goes through
//! - `google` - Typed clients for the Google REST APIs
//! - `normalize` - Repair of Python-style literals into strict JSON
//! - `calculator` - Constrained arithmetic evaluator
//! - `tools` - The `Tool` trait and registry
//! - `agent` - OpenAI tool-calling loop
//!
//! # Example
//!
//! ```rust,no_run
//! use errand::config::{Credentials, Settings};
//! use errand::http::HttpTransport;
//! use errand::tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::resolve(&settings);
//!     let transport = Arc::new(HttpTransport::new(&settings.http)?);
//!     let tools = ToolRegistry::standard(&settings, &credentials, transport);
//!
//!     let answer = tools.call("Calculator", "(3 + 4) * 2 ** 3").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod error;
pub mod google;
pub mod http;
pub mod normalize;
pub mod openai;
pub mod tools;

pub use error::{ErrandError, Result, ToolError};
