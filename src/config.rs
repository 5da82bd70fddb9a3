use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".release-notes.toml";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_AZURE_URL: &str = "https://dev.azure.com";
pub const DEFAULT_AZURE_API_VERSION: &str = "7.1-preview.1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .release-notes.toml.
///
/// Every field is optional; the service runs with zero config. Credentials
/// never live here, they arrive with each form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub azure: AzureConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the web form listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// Azure DevOps REST settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureConfig {
    /// Organization host. If None, falls back to AZURE_DEVOPS_URL, then dev.azure.com.
    pub base_url: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: default_api_version(),
        }
    }
}

impl AzureConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_AZURE_URL)
            .trim_end_matches('/')
    }
}

/// Chat-completion API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API root. If None, falls back to OPENAI_BASE_URL, then api.openai.com.
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Outbound request timeout in seconds; 0 disables it.
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
            system_prompt: default_system_prompt(),
            timeout_secs: 0,
        }
    }
}

impl OpenAiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_api_version() -> String {
    DEFAULT_AZURE_API_VERSION.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Config {
    /// Load configuration from an explicit path, or from .release-notes.toml
    /// in the current directory when it exists. Missing default file means
    /// default config; a missing explicit file is an error.
    ///
    /// Base URLs left unset fall back to AZURE_DEVOPS_URL / OPENAI_BASE_URL.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.azure.base_url.is_none() {
            config.azure.base_url = std::env::var("AZURE_DEVOPS_URL").ok();
        }
        if config.openai.base_url.is_none() {
            config.openai.base_url = std::env::var("OPENAI_BASE_URL").ok();
        }

        Ok(config)
    }

    /// Load from a specific path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}
