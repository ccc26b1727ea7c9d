//! Configuration settings for Errand.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub agent: AgentSettings,
    pub search: SearchSettings,
    pub google: GoogleSettings,
    pub http: HttpSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Chat model used for tool selection and the final answer.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum model round trips before giving up.
    pub max_iterations: usize,
    /// Request used by `errand ask` when none is given.
    pub default_request: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_iterations: 10,
            default_request: "Any events for today in calendar".to_string(),
        }
    }
}

/// Google Custom Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Custom Search JSON API endpoint.
    pub endpoint: String,
    /// Recency restriction passed as `dateRestrict` (e.g. `m6` = last 6 months).
    pub date_restrict: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            date_restrict: "m6".to_string(),
        }
    }
}

/// Gmail and Google Calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth token endpoint used to exchange refresh tokens.
    pub token_uri: String,
    /// Gmail REST API base URL.
    pub gmail_api_base: String,
    /// Calendar REST API base URL.
    pub calendar_api_base: String,
    /// Calendar to list and create events in.
    pub calendar_id: String,
    /// Maximum emails / events returned by the list tools.
    pub max_results: u32,
    /// Optional authorized-user `token.json` used for Gmail when the
    /// environment does not provide OAuth credentials.
    pub gmail_token_file: Option<String>,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            gmail_api_base: "https://gmail.googleapis.com/gmail/v1".to_string(),
            calendar_api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: "primary".to_string(),
            max_results: 5,
            gmail_token_file: None,
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ErrandError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("errand")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded Gmail token file path, if configured.
    pub fn gmail_token_file(&self) -> Option<PathBuf> {
        self.google
            .gmail_token_file
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.agent.model, "gpt-4o-mini");
        assert_eq!(settings.agent.temperature, 0.0);
        assert_eq!(settings.search.date_restrict, "m6");
        assert_eq!(settings.google.max_results, 5);
        assert_eq!(settings.google.calendar_id, "primary");
        assert!(settings.gmail_token_file().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[agent]\nmodel = \"gpt-4o\"\n\n[google]\nmax_results = 3\ngmail_token_file = \"/tmp/token.json\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.agent.model, "gpt-4o");
        assert_eq!(settings.agent.max_iterations, 10);
        assert_eq!(settings.google.max_results, 3);
        assert_eq!(
            settings.google.token_uri,
            "https://oauth2.googleapis.com/token"
        );
        assert_eq!(
            settings.gmail_token_file(),
            Some(PathBuf::from("/tmp/token.json"))
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.http.timeout_secs, 60);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = Settings::default();
        settings.search.date_restrict = "d7".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.search.date_restrict, "d7");
    }
}
