//! Tool-calling agent.
//!
//! Sends the user's request to an OpenAI chat model together with the tool
//! definitions, runs whatever tools the model asks for one at a time, and
//! feeds the results back until the model gives a final answer.

mod runner;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
