//! Ollama transport implementation for SQLWise
//!
//! This module implements the `ChatTransport` trait for Ollama, connecting
//! to a local or remote Ollama server. The chat endpoint is called with
//! JSON output mode enabled so the model is steered toward the structured
//! reply the generation client expects.

use crate::config::OllamaConfig;
use crate::error::{Result, SqlwiseError};
use crate::providers::{ChatTransport, Message};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API transport
///
/// Connects to an Ollama server (local or remote) and runs one non-streaming
/// chat completion per call.
///
/// # Examples
///
/// ```no_run
/// use sqlwise::config::OllamaConfig;
/// use sqlwise::providers::{ChatTransport, Message, OllamaTransport};
///
/// # async fn example() -> sqlwise::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
/// };
/// let transport = OllamaTransport::new(config)?;
/// let reply = transport.send(&[Message::user("Hello!")]).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaTransport {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/chat endpoint
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    /// Constrains the model to emit a single JSON object
    format: String,
}

/// Message structure for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama's /api/chat endpoint
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
}

impl OllamaTransport {
    /// Create a new Ollama transport instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host and model
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::config::OllamaConfig;
    /// use sqlwise::providers::OllamaTransport;
    ///
    /// let transport = OllamaTransport::new(OllamaConfig::default());
    /// assert!(transport.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("sqlwise/0.1.0")
            .build()
            .map_err(|e| SqlwiseError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama transport: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Convert SQLWise messages to Ollama format
    fn convert_messages(&self, messages: &[Message]) -> Vec<OllamaMessage> {
        messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for OllamaTransport {
    async fn send(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/api/chat", self.config.host);

        let request = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: self.convert_messages(messages),
            stream: false,
            format: "json".to_string(),
        };

        tracing::debug!(
            "Sending Ollama request: {} messages, model={}",
            request.messages.len(),
            request.model
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                SqlwiseError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(SqlwiseError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let chat_response: OllamaChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response envelope: {}", e);
            SqlwiseError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, {} bytes",
            chat_response.done,
            chat_response.message.content.len()
        );

        Ok(chat_response.message.content)
    }

    fn describe(&self) -> String {
        format!("ollama ({}) @ {}", self.config.model, self.config.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OllamaConfig {
        OllamaConfig {
            host: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
        }
    }

    #[test]
    fn test_ollama_transport_creation() {
        let transport = OllamaTransport::new(test_config());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_ollama_transport_host_and_model() {
        let transport = OllamaTransport::new(test_config()).unwrap();
        assert_eq!(transport.host(), "http://localhost:11434");
        assert_eq!(transport.model(), "llama3.2:latest");
    }

    #[test]
    fn test_convert_messages_preserves_roles_and_order() {
        let transport = OllamaTransport::new(test_config()).unwrap();

        let messages = vec![
            Message::system("You are the SQL Neural Engine"),
            Message::user("Hello"),
            Message::assistant("{\"sql\":\"\"}"),
        ];

        let converted = transport.convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
        assert_eq!(converted[2].role, "assistant");
        assert_eq!(converted[1].content, "Hello");
    }

    #[test]
    fn test_request_serialization_includes_json_format() {
        let request = OllamaChatRequest {
            model: "llama3.2:latest".to_string(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            stream: false,
            format: "json".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"format\":\"json\""));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"message":{"role":"assistant","content":"{\"sql\":\"SELECT 1\"}"},"done":true}"#;
        let response: OllamaChatResponse = serde_json::from_str(body).unwrap();
        assert!(response.done);
        assert_eq!(response.message.content, "{\"sql\":\"SELECT 1\"}");
    }

    #[test]
    fn test_describe() {
        let transport = OllamaTransport::new(test_config()).unwrap();
        let description = transport.describe();
        assert!(description.contains("ollama"));
        assert!(description.contains("llama3.2:latest"));
        assert!(description.contains("http://localhost:11434"));
    }
}
