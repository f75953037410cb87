//! Transport boundary and common message types for SQLWise
//!
//! This module defines the `ChatTransport` trait that all generation
//! providers implement, plus the vendor-neutral message type exchanged with
//! them. The transport is an opaque handle: it ships the full conversational
//! context on every call and hands back the model's raw text reply. Imposing
//! structure on that reply is the generation client's job, not the
//! transport's.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for conversation
///
/// Represents one turn in the conversation sent to the generation provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::providers::Message;
    ///
    /// let msg = Message::user("Show me all users from USA");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::providers::Message;
    ///
    /// let msg = Message::assistant("{\"sql\":\"SELECT 1\"}");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::providers::Message;
    ///
    /// let msg = Message::system("You are the SQL Neural Engine");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Chat transport trait for generation providers
///
/// All generation providers (Ollama, Gemini, test fakes) implement this
/// trait. Conversational context is carried by the caller and resent in full
/// on every call, so a transport holds no per-session state.
///
/// # Examples
///
/// ```no_run
/// use sqlwise::providers::{ChatTransport, Message};
/// use sqlwise::error::Result;
/// use async_trait::async_trait;
///
/// struct MyTransport;
///
/// #[async_trait]
/// impl ChatTransport for MyTransport {
///     async fn send(&self, _messages: &[Message]) -> Result<String> {
///         Ok("{\"sql\":\"SELECT 1\",\"explanation\":\"e\",\"reasoning\":[]}".to_string())
///     }
///
///     fn describe(&self) -> String {
///         "my-transport".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the conversation and return the model's raw text reply
    ///
    /// # Arguments
    ///
    /// * `messages` - Full conversation: system instruction, prior turns,
    ///   and the new user utterance, in order
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or the provider's envelope cannot be
    /// read. The text inside the envelope is returned unparsed.
    async fn send(&self, messages: &[Message]) -> Result<String>;

    /// Human-readable description for status output, e.g.
    /// `ollama (llama3.2:latest) @ http://localhost:11434`
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_system() {
        let msg = Message::system("System prompt");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "System prompt");
    }

    #[test]
    fn test_message_user_with_string() {
        let msg = Message::user(String::from("Hello"));
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Test\""));
    }

    #[test]
    fn test_message_deserialization() {
        let msg: Message =
            serde_json::from_str("{\"role\":\"assistant\",\"content\":\"ok\"}").unwrap();
        assert_eq!(msg, Message::assistant("ok"));
    }
}
