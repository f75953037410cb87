//! Provider module for SQLWise
//!
//! This module contains the chat transport abstraction and implementations
//! for Ollama and Gemini.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{ChatTransport, Message};
pub use gemini::GeminiTransport;
pub use ollama::OllamaTransport;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create a transport instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("ollama" or "gemini")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed transport instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_transport(
    provider_type: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn ChatTransport>> {
    match provider_type {
        "ollama" => Ok(Box::new(OllamaTransport::new(config.ollama.clone())?)),
        "gemini" => Ok(Box::new(GeminiTransport::new(config.gemini.clone())?)),
        _ => Err(crate::error::SqlwiseError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, OllamaConfig};

    fn provider_config() -> ProviderConfig {
        ProviderConfig {
            provider_type: "ollama".to_string(),
            ollama: OllamaConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }

    #[test]
    fn test_create_transport_ollama() {
        let result = create_transport("ollama", &provider_config());
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_transport_gemini() {
        let result = create_transport("gemini", &provider_config());
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_transport_invalid_type() {
        let result = create_transport("copilot", &provider_config());
        assert!(result.is_err());
    }
}
