//! Doctor command - report which credentials and settings are in place.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(
    settings: &Settings,
    credentials: &Credentials,
    config_path: &Path,
) -> anyhow::Result<()> {
    Output::header("Errand Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Model").bold());
    let api_check = check_openai_api_key(credentials.openai_api_key.as_deref());
    api_check.print();
    checks.push(api_check);
    Output::kv("model", &settings.agent.model);
    println!();

    println!("{}", style("Tools").bold());
    let tool_checks = check_tool_credentials(settings, credentials);
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);
    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Errand.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "Ready, but {} tool group(s) are not configured and will report an error when called.",
            warnings
        ));
    } else {
        Output::success("All checks passed! Every tool is configured.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask(key)))
        }
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' or add it to .env",
        ),
    }
}

/// The calculator needs nothing; the Google tools need their credentials.
fn check_tool_credentials(settings: &Settings, credentials: &Credentials) -> Vec<CheckResult> {
    let mut results = vec![CheckResult::ok("Calculator", "always available")];

    results.push(match &credentials.search {
        Some(_) => CheckResult::ok("webSearch", "GOOGLE_API_KEY and GOOGLE_CSE_CX set"),
        None => CheckResult::warning(
            "webSearch",
            "Google CSE API key or CX ID is missing",
            "Set GOOGLE_API_KEY and GOOGLE_CSE_CX",
        ),
    });

    let gmail_hint = match settings.gmail_token_file() {
        Some(path) if !path.exists() => {
            format!("Token file {} does not exist; set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GMAIL_REFRESH_TOKEN", path.display())
        }
        _ => "Set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GMAIL_REFRESH_TOKEN".to_string(),
    };
    results.push(match &credentials.gmail {
        Some(_) => CheckResult::ok("Gmail", "OAuth credentials configured"),
        None => CheckResult::warning("Gmail", "OAuth credentials missing", &gmail_hint),
    });

    results.push(match &credentials.calendar {
        Some(_) => CheckResult::ok("Google Calendar", "OAuth credentials configured"),
        None => CheckResult::warning(
            "Google Calendar",
            "OAuth credentials missing",
            "Set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and CALENDAR_REFRESH_TOKEN",
        ),
    });

    results
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: errand config init",
        )
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(7).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchCredentials;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_checks() {
        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("abc")).status, CheckStatus::Warning);

        let ok = check_openai_api_key(Some("sk-proj-abcdefghijklmnop1234"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert_eq!(ok.message, "configured (sk-proj...1234)");
    }

    #[test]
    fn test_tool_credentials() {
        let credentials = Credentials {
            search: Some(SearchCredentials {
                api_key: "key".to_string(),
                cx: "cx".to_string(),
            }),
            ..Default::default()
        };
        let checks = check_tool_credentials(&Settings::default(), &credentials);
        let statuses: Vec<_> = checks.iter().map(|c| (c.name.as_str(), &c.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("Calculator", &CheckStatus::Ok),
                ("webSearch", &CheckStatus::Ok),
                ("Gmail", &CheckStatus::Warning),
                ("Google Calendar", &CheckStatus::Warning),
            ]
        );
    }

    #[test]
    fn test_missing_config_file_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_config_file(&dir.path().join("config.toml"));
        assert_eq!(check.status, CheckStatus::Warning);
    }
}
