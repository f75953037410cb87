//! Gemini transport implementation for SQLWise
//!
//! This module implements the `ChatTransport` trait against the Gemini
//! `generateContent` REST endpoint. System messages map onto the dedicated
//! `systemInstruction` field, assistant turns onto the `model` role, and the
//! response MIME type is pinned to JSON so the engine returns the structured
//! reply directly.
//!
//! The API base is overridable through configuration, which lets tests point
//! the transport at a mock server.

use crate::config::GeminiConfig;
use crate::error::{Result, SqlwiseError};
use crate::providers::{ChatTransport, Message};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default public endpoint for the Gemini API
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API transport
///
/// The API key is read from the environment variable named in the
/// configuration at construction time. A missing key does not fail
/// construction; the failure surfaces on first use.
pub struct GeminiTransport {
    client: Client,
    config: GeminiConfig,
    api_key: Option<String>,
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

/// One content block: a role plus ordered text parts
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

/// Response envelope from generateContent
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiTransport {
    /// Create a new Gemini transport instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration (model, optional api_base, key env var)
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails. A missing API key
    /// is not an error here.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("sqlwise/0.1.0")
            .build()
            .map_err(|e| SqlwiseError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                "No API key found in ${}; Gemini calls will fail until it is set",
                config.api_key_env
            );
        }

        tracing::info!("Initialized Gemini transport: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn api_base(&self) -> &str {
        self.config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Split SQLWise messages into the system instruction and the turn list
    ///
    /// Gemini has no "system" role inside `contents`; the first system
    /// message becomes the `systemInstruction` field and assistant turns are
    /// renamed to the `model` role.
    fn convert_messages(messages: &[Message]) -> (Option<GeminiContent>, Vec<GeminiContent>) {
        let mut system_instruction = None;
        let mut contents = Vec::new();

        for message in messages {
            match message.role.as_str() {
                "system" => {
                    if system_instruction.is_none() {
                        system_instruction = Some(GeminiContent {
                            role: None,
                            parts: vec![GeminiPart {
                                text: message.content.clone(),
                            }],
                        });
                    }
                }
                role => {
                    let mapped = if role == "assistant" { "model" } else { "user" };
                    contents.push(GeminiContent {
                        role: Some(mapped.to_string()),
                        parts: vec![GeminiPart {
                            text: message.content.clone(),
                        }],
                    });
                }
            }
        }

        (system_instruction, contents)
    }
}

#[async_trait]
impl ChatTransport for GeminiTransport {
    async fn send(&self, messages: &[Message]) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SqlwiseError::Provider(format!(
                "Missing Gemini API key: set ${}",
                self.config.api_key_env
            ))
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base(),
            self.config.model
        );

        let (system_instruction, contents) = Self::convert_messages(messages);
        let request = GeminiRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        tracing::debug!(
            "Sending Gemini request: {} contents, model={}",
            request.contents.len(),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                SqlwiseError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(SqlwiseError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let envelope: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response envelope: {}", e);
            SqlwiseError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                SqlwiseError::Provider("Gemini response contained no candidates".to_string())
            })?;

        Ok(text)
    }

    fn describe(&self) -> String {
        format!("gemini ({})", self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_transport_creation_without_key() {
        let config = GeminiConfig {
            api_base: None,
            model: "gemini-3-pro-preview".to_string(),
            api_key_env: "SQLWISE_TEST_UNSET_KEY".to_string(),
        };
        // Missing key must not fail construction
        let transport = GeminiTransport::new(config);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_api_base_default_and_override() {
        let transport = GeminiTransport::new(GeminiConfig::default()).unwrap();
        assert_eq!(transport.api_base(), DEFAULT_API_BASE);

        let transport = GeminiTransport::new(GeminiConfig {
            api_base: Some("http://localhost:9999".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(transport.api_base(), "http://localhost:9999");
    }

    #[test]
    fn test_convert_messages_extracts_system_instruction() {
        let messages = vec![
            Message::system("You are the SQL Neural Engine"),
            Message::user("Hello"),
            Message::assistant("{\"sql\":\"SELECT 1\"}"),
        ];

        let (system, contents) = GeminiTransport::convert_messages(&messages);

        let system = system.expect("system instruction present");
        assert_eq!(system.parts[0].text, "You are the SQL Neural Engine");

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_convert_messages_without_system() {
        let messages = vec![Message::user("Hello")];
        let (system, contents) = GeminiTransport::convert_messages(&messages);
        assert!(system.is_none());
        assert_eq!(contents.len(), 1);
    }

    #[test]
    fn test_request_serialization_field_names() {
        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: "sys".to_string(),
                }],
            }),
            contents: vec![],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"sql\":\"SELECT 1\"}"}]}}
            ]
        }"#;
        let envelope: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.candidates.len(), 1);
        assert_eq!(
            envelope.candidates[0].content.parts[0].text,
            "{\"sql\":\"SELECT 1\"}"
        );
    }

    #[test]
    fn test_describe() {
        let transport = GeminiTransport::new(GeminiConfig::default()).unwrap();
        assert!(transport.describe().contains("gemini"));
    }
}
