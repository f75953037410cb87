//! Configuration management for SQLWise
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SqlwiseError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for SQLWise
///
/// Holds the provider selection plus chat defaults. Every field carries a
/// serde default so a partial (or absent) file still yields a working
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, Gemini)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Chat defaults
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("ollama" or "gemini")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the `generateContent` endpoint,
    /// which allows tests to point the transport at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,
}

fn default_gemini_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            model: default_gemini_model(),
            api_key_env: default_gemini_key_env(),
        }
    }
}

/// Chat defaults
///
/// Starting schema and dialect for interactive sessions, and an optional
/// history file override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Schema id selected at startup; first catalog schema when unset
    #[serde(default)]
    pub schema: Option<String>,

    /// Dialect selected at startup; PostgreSQL when unset
    #[serde(default)]
    pub dialect: Option<String>,

    /// History file location; platform data directory when unset
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file with environment overrides applied
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SqlwiseError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SqlwiseError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("SQLWISE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(host) = std::env::var("SQLWISE_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("SQLWISE_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(model) = std::env::var("SQLWISE_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown or the configured
    /// default dialect does not parse
    pub fn validate(&self) -> Result<()> {
        match self.provider.provider_type.as_str() {
            "ollama" | "gemini" => {}
            other => {
                return Err(SqlwiseError::Config(format!(
                    "Unknown provider type: {} (expected \"ollama\" or \"gemini\")",
                    other
                ))
                .into());
            }
        }

        if let Some(dialect) = &self.chat.dialect {
            dialect.parse::<crate::catalog::Dialect>()?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}
