//! Service configuration read from environment variables

use std::env;

/// Where the process is running; development disables the data cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Production,
    Development,
}

impl ExecutionMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => ExecutionMode::Development,
            _ => ExecutionMode::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == ExecutionMode::Development
    }
}

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub port: u16,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub mode: ExecutionMode,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            github_token: None,
            github_api_url: github_api::GitHubClient::BASE_URL.to_string(),
            mode: ExecutionMode::Production,
        }
    }
}

impl WidgetConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let github_token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());

        let github_api_url = lookup("GITHUB_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.github_api_url);

        let mode = lookup("APP_ENV")
            .map(|v| ExecutionMode::parse(&v))
            .unwrap_or_default();

        Self {
            port,
            github_token,
            github_api_url,
            mode,
        }
    }
}
