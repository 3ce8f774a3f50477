//! Configuration loading for github-repos-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables (`GITHUB_TOKEN`, `GITHUB_API_URL`)
//! 2. Config file at `GITHUB_REPOS_CONFIG_PATH`
//! 3. ~/.binks/github-repos.toml
//! 4. Default values

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API connection settings
    #[serde(default)]
    pub github: GitHubConfig,
    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetryConfig,
    /// Tool dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// GitHub API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API root (GitHub Enterprise: `https://host/api/v3`)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Personal access token; prefer the `GITHUB_TOKEN` env var
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// Page size for list calls (GitHub allows at most 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts allowed after a rate-limit response
    #[serde(default = "default_rate_limit_retries")]
    pub max_rate_limit_retries: u32,
    /// Attempts allowed after a 5xx or connection failure
    #[serde(default = "default_server_retries")]
    pub max_server_retries: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound for one tool invocation; 0 disables the limit
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_user_agent() -> String {
    concat!("github-repos-mcp/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_rate_limit_retries() -> u32 {
    5
}

fn default_server_retries() -> u32 {
    2
}

fn default_base_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    30_000
}

fn default_timeout() -> u64 {
    60
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            per_page: default_per_page(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_rate_limit_retries: default_rate_limit_retries(),
            max_server_retries: default_server_retries(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("per_page", &self.per_page)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl GitHubConfig {
    /// The configured token, ignoring blank values
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl DispatchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_path();

        let mut config = if let Some(path) = config_path {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_file(&path)?
            } else {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
        } else {
            tracing::info!("No config path specified, using defaults");
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment values (highest priority)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(url) = lookup("GITHUB_API_URL") {
            self.github.api_url = url;
        }
    }

    /// Fail unless a usable credential is configured.
    ///
    /// Missing credentials are the one startup condition the server refuses
    /// to run without.
    pub fn require_token(&self) -> Result<()> {
        match self.github.token.as_deref() {
            None => bail!("GITHUB_TOKEN environment variable is not set"),
            Some(t) if t.trim().is_empty() => bail!("GITHUB_TOKEN environment variable is empty"),
            Some(_) => Ok(()),
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("GITHUB_REPOS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.binks/github-repos.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".binks").join("github-repos.toml");
            return Some(path);
        }

        None
    }
}
