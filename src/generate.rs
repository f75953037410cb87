//! Structured SQL generation over a chat transport
//!
//! The generation client turns one user utterance into a structured reply
//! through the current session's transport. Transport failures and malformed
//! model replies are indistinguishable to the caller; both surface as a
//! single `Generation` error carrying a user-facing message. No retry is
//! attempted.
//!
//! The client has no side effects beyond the network call: it mutates
//! neither the session nor the history. The caller appends results.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlwiseError};
use crate::providers::{ChatTransport, Message};
use crate::session::Session;

/// User-facing message for any generation failure
pub const INTENT_PARSE_FAILURE: &str = "engine failed to parse intent";

/// Structured reply from the engine
///
/// `sql` may be empty when the engine answers without a query (e.g. asks a
/// clarifying question); `reasoning` is required by the output contract;
/// `suggestions` is optional and defaults to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlGeneration {
    pub sql: String,
    pub explanation: String,
    pub reasoning: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Client that runs one generation per call against a transport
pub struct GenerationClient {
    transport: Box<dyn ChatTransport>,
}

impl GenerationClient {
    /// Create a client over a transport
    pub fn new(transport: Box<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Human-readable transport description for status output
    pub fn describe_transport(&self) -> String {
        self.transport.describe()
    }

    /// Generate a structured reply for one utterance
    ///
    /// Sends the session transcript plus the trimmed utterance and parses
    /// the reply against the output contract.
    ///
    /// # Arguments
    ///
    /// * `session` - Live session providing the conversational context
    /// * `utterance` - Non-empty natural-language request
    ///
    /// # Errors
    ///
    /// Returns `SqlwiseError::Generation` on transport failure or when the
    /// reply is not the required JSON shape.
    pub async fn generate(&self, session: &Session, utterance: &str) -> Result<SqlGeneration> {
        let mut messages = session.messages().to_vec();
        messages.push(Message::user(utterance.trim()));

        let raw = match self.transport.send(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("generation transport failed: {}", e);
                return Err(SqlwiseError::Generation(INTENT_PARSE_FAILURE.to_string()).into());
            }
        };

        parse_generation(&raw)
    }
}

/// Parse a raw model reply into a structured generation
///
/// Tolerates Markdown code fences around the JSON object; models emit them
/// even when instructed not to. Any other deviation from the contract is a
/// generation failure.
pub fn parse_generation(raw: &str) -> Result<SqlGeneration> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|e| {
        tracing::error!("malformed generation reply: {}", e);
        SqlwiseError::Generation(INTENT_PARSE_FAILURE.to_string()).into()
    })
}

/// Strip a surrounding Markdown code fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    // Drop the info string ("json", "sql", ...) up to the first newline
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Dialect};
    use crate::session::SessionManager;
    use async_trait::async_trait;

    /// Transport fake returning a canned reply or failing on demand
    struct FakeTransport {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn send(&self, _messages: &[Message]) -> Result<String> {
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(SqlwiseError::Provider("connection refused".to_string()).into()),
            }
        }

        fn describe(&self) -> String {
            "fake".to_string()
        }
    }

    fn well_formed() -> &'static str {
        r#"{"sql":"SELECT 1","explanation":"e","reasoning":["r1"]}"#
    }

    #[test]
    fn test_parse_generation_well_formed() {
        let gen = parse_generation(well_formed()).unwrap();
        assert_eq!(gen.sql, "SELECT 1");
        assert_eq!(gen.explanation, "e");
        assert_eq!(gen.reasoning, vec!["r1".to_string()]);
        assert!(gen.suggestions.is_empty());
    }

    #[test]
    fn test_parse_generation_with_suggestions() {
        let raw = r#"{"sql":"","explanation":"e","reasoning":[],"suggestions":["s1","s2"]}"#;
        let gen = parse_generation(raw).unwrap();
        assert!(gen.sql.is_empty());
        assert_eq!(gen.suggestions.len(), 2);
    }

    #[test]
    fn test_parse_generation_fenced() {
        let raw = format!("```json\n{}\n```", well_formed());
        let gen = parse_generation(&raw).unwrap();
        assert_eq!(gen.sql, "SELECT 1");
    }

    #[test]
    fn test_parse_generation_fenced_without_info_string() {
        let raw = format!("```\n{}\n```", well_formed());
        let gen = parse_generation(&raw).unwrap();
        assert_eq!(gen.sql, "SELECT 1");
    }

    #[test]
    fn test_parse_generation_malformed_is_generation_error() {
        let err = parse_generation("the model felt chatty today").unwrap_err();
        let err = err.downcast::<SqlwiseError>().unwrap();
        assert!(matches!(err, SqlwiseError::Generation(_)));
        assert!(err.to_string().contains(INTENT_PARSE_FAILURE));
    }

    #[test]
    fn test_parse_generation_missing_required_field() {
        // "reasoning" is required by the contract
        let raw = r#"{"sql":"SELECT 1","explanation":"e"}"#;
        assert!(parse_generation(raw).is_err());
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_generate_parses_reply() {
        let catalog = Catalog::builtin();
        let mut manager = SessionManager::new();
        let session = manager
            .ensure(catalog.default_schema(), Dialect::PostgreSql)
            .clone();

        let client = GenerationClient::new(Box::new(FakeTransport {
            reply: Some(well_formed().to_string()),
        }));

        let gen = client.generate(&session, "  count runs  ").await.unwrap();
        assert_eq!(gen.sql, "SELECT 1");
    }

    #[tokio::test]
    async fn test_generate_transport_failure_is_generation_error() {
        let catalog = Catalog::builtin();
        let mut manager = SessionManager::new();
        let session = manager
            .ensure(catalog.default_schema(), Dialect::PostgreSql)
            .clone();

        let client = GenerationClient::new(Box::new(FakeTransport { reply: None }));

        let err = client.generate(&session, "count runs").await.unwrap_err();
        let err = err.downcast::<SqlwiseError>().unwrap();
        assert!(matches!(err, SqlwiseError::Generation(_)));
    }

    #[tokio::test]
    async fn test_generate_does_not_mutate_session() {
        let catalog = Catalog::builtin();
        let mut manager = SessionManager::new();
        let session = manager
            .ensure(catalog.default_schema(), Dialect::PostgreSql)
            .clone();
        let before = session.messages().len();

        let client = GenerationClient::new(Box::new(FakeTransport {
            reply: Some(well_formed().to_string()),
        }));
        client.generate(&session, "count runs").await.unwrap();

        assert_eq!(session.messages().len(), before);
    }
}
