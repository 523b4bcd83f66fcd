//! Configuration management for Skybrief
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/skybrief/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, SkybriefError};

/// Main configuration for Skybrief
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model gateway configuration
    pub llm: LlmConfig,
    /// Weather service configuration
    pub weather: WeatherConfig,
    /// Mail relay configuration
    #[serde(default)]
    pub mail: MailConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Model gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// API key, if the endpoint requires one
    pub api_key: Option<String>,
    /// Model name to request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the text-weather service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Mail relay configuration
///
/// All fields come from the environment; each is optional here so that a run
/// without the email tool configured can still start. [`MailConfig::require`]
/// turns missing fields into an error naming the variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    /// Relay hostname (SMTP_HOST)
    pub host: Option<String>,
    /// Relay port (SMTP_PORT)
    pub port: Option<u16>,
    /// Relay username (SMTP_USERNAME)
    pub username: Option<String>,
    /// Relay password (SMTP_PASSWORD)
    pub password: Option<String>,
    /// From address (SMTP_FROM)
    pub from: Option<String>,
}

/// Fully resolved mail relay settings
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-dispatch rounds before the run is declared failed
    /// Default: 6
    pub max_iterations: usize,
    /// Whether to show debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            weather: WeatherConfig::default(),
            mail: MailConfig::from_env(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SKYBRIEF_LLM_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("SKYBRIEF_API_KEY")
                .ok()
                .or_else(|| env::var("OPENAI_API_KEY").ok()),
            model: env::var("SKYBRIEF_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SKYBRIEF_WEATHER_URL")
                .unwrap_or_else(|_| "https://wttr.in".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 6,
            debug: env::var("SKYBRIEF_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl MailConfig {
    /// Read mail relay settings from the environment
    pub fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok(),
            port: env::var("SMTP_PORT").ok().and_then(|p| p.parse().ok()),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            from: env::var("SMTP_FROM").ok(),
        }
    }

    /// Resolve the full relay settings, naming the first missing variable
    pub fn require(&self) -> Result<MailSettings> {
        let missing = |var: &str| SkybriefError::config(format!("missing {}", var));

        Ok(MailSettings {
            host: self.host.clone().ok_or_else(|| missing("SMTP_HOST"))?,
            port: self.port.ok_or_else(|| missing("SMTP_PORT"))?,
            username: self
                .username
                .clone()
                .ok_or_else(|| missing("SMTP_USERNAME"))?,
            password: self
                .password
                .clone()
                .ok_or_else(|| missing("SMTP_PASSWORD"))?,
            from: self.from.clone().ok_or_else(|| missing("SMTP_FROM"))?,
        })
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skybrief")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(mut config) = Self::load_from_file() {
            // Relay settings always come from the environment
            config.mail = MailConfig::from_env();
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(SkybriefError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| SkybriefError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SkybriefError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.max_iterations, 6);
        assert_eq!(config.weather.base_url, "https://wttr.in");
        assert_eq!(config.llm.timeout_secs, 120);
    }

    #[test]
    fn test_mail_require_names_missing_variable() {
        let mail = MailConfig {
            host: Some("smtp.example.com".to_string()),
            port: Some(587),
            username: None,
            password: Some("secret".to_string()),
            from: Some("bot@example.com".to_string()),
        };

        let err = mail.require().unwrap_err();
        assert!(err.to_string().contains("SMTP_USERNAME"));
    }

    #[test]
    fn test_mail_require_complete() {
        let mail = MailConfig {
            host: Some("smtp.example.com".to_string()),
            port: Some(587),
            username: Some("bot".to_string()),
            password: Some("secret".to_string()),
            from: Some("bot@example.com".to_string()),
        };

        let settings = mail.require().unwrap();
        assert_eq!(settings.port, 587);
        assert_eq!(settings.from, "bot@example.com");
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("skybrief"));
    }
}
