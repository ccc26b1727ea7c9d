//! Configuration module for Errand.
//!
//! Handles loading application settings and resolving API credentials.

mod credentials;
mod settings;

pub use credentials::{Credentials, OAuthCredentials, SearchCredentials};
pub use settings::{
    AgentSettings, GeneralSettings, GoogleSettings, HttpSettings, SearchSettings, Settings,
};
