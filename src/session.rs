//! Conversational session management
//!
//! A session binds the conversation to exactly one (schema, dialect) pair.
//! Its first transcript entry is the system instruction embedding the
//! serialized schema, the dialect name, and the strict output-format
//! directive; subsequent entries are the prior turns, resent in full on
//! every call so the engine generates with context.
//!
//! The `SessionManager` owns at most one live session. Any change to the
//! selected schema or dialect discards the current session, clears the
//! in-memory conversation, and installs a fresh session under a new tag.
//! Generations started against a discarded session carry a stale tag and
//! their results are dropped instead of being attributed to the wrong
//! schema.

use serde::{Deserialize, Serialize};

use crate::catalog::{Dialect, Schema};
use crate::generate::SqlGeneration;
use crate::providers::Message;

/// Monotonic identity of one session within a process
pub type SessionTag = u64;

/// Role of a conversation entry shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One user-visible conversation entry
///
/// Assistant entries optionally carry the generated SQL, ordered reasoning
/// steps, and follow-up suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ChatMessage {
    /// Build a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sql: None,
            reasoning: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Build an assistant entry from a generation result
    ///
    /// The explanation becomes the message body; an empty `sql` field maps
    /// to `None`.
    pub fn assistant(generation: &SqlGeneration) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: generation.explanation.clone(),
            sql: if generation.sql.is_empty() {
                None
            } else {
                Some(generation.sql.clone())
            },
            reasoning: generation.reasoning.clone(),
            suggestions: generation.suggestions.clone(),
        }
    }
}

/// Build the system instruction for a (schema, dialect) pair
///
/// Embeds the JSON-serialized schema, the dialect name, and the output
/// contract the generation client parses against.
pub fn build_system_instruction(schema: &Schema, dialect: Dialect) -> String {
    let schema_context =
        serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are the SQL Neural Engine, a specialized AI for high-performance data engineering.

SCHEMA:
{schema_context}

DIALECT: {dialect}

TASK:
1. Analyze the user's intent.
2. Map natural language to the provided schema.
3. Generate optimized, syntactically perfect SQL.
4. Provide a "reasoning" array of steps showing your chain of thought (e.g. "Step 1: Identified 'revenue' as SUM(amount)...").

RESPONSE FORMAT:
You MUST return a single JSON object:
{{
  "sql": "...",
  "explanation": "Brief overview of what the query does.",
  "reasoning": ["Step 1...", "Step 2..."],
  "suggestions": ["Optional follow up 1", "Optional follow up 2"]
}}"#
    )
}

/// Opaque handle to one conversational context
///
/// Bound to exactly one (schema, dialect) pair for its whole lifetime.
/// Construction never fails; transport problems surface on first use.
#[derive(Debug, Clone)]
pub struct Session {
    tag: SessionTag,
    schema_id: String,
    dialect: Dialect,
    transcript: Vec<Message>,
}

impl Session {
    fn new(tag: SessionTag, schema: &Schema, dialect: Dialect) -> Self {
        Self {
            tag,
            schema_id: schema.id.clone(),
            dialect,
            transcript: vec![Message::system(build_system_instruction(schema, dialect))],
        }
    }

    /// Tag identifying this session instance
    pub fn tag(&self) -> SessionTag {
        self.tag
    }

    /// Id of the schema this session is bound to
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Dialect this session is bound to
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Full transcript: system instruction followed by prior turns
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    fn record_turn(&mut self, utterance: &str, reply: String) {
        self.transcript.push(Message::user(utterance));
        self.transcript.push(Message::assistant(reply));
    }
}

/// Owner of the single live session and the in-memory conversation
#[derive(Debug, Default)]
pub struct SessionManager {
    current: Option<Session>,
    next_tag: SessionTag,
    messages: Vec<ChatMessage>,
}

impl SessionManager {
    /// Create an empty manager with no live session
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for (schema, dialect), creating it if needed
    ///
    /// If the live session is already bound to the same pair it is returned
    /// unchanged. Otherwise the previous session is discarded, the in-memory
    /// conversation is cleared, and a fresh session with a new tag is
    /// installed. History is never touched here.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::catalog::{Catalog, Dialect};
    /// use sqlwise::session::SessionManager;
    ///
    /// let catalog = Catalog::builtin();
    /// let mut manager = SessionManager::new();
    /// let tag = manager
    ///     .ensure(catalog.default_schema(), Dialect::PostgreSql)
    ///     .tag();
    /// // Same pair: same session
    /// assert_eq!(
    ///     manager.ensure(catalog.default_schema(), Dialect::PostgreSql).tag(),
    ///     tag
    /// );
    /// ```
    pub fn ensure(&mut self, schema: &Schema, dialect: Dialect) -> &Session {
        let mismatched = self
            .current
            .as_ref()
            .is_some_and(|s| s.schema_id != schema.id || s.dialect != dialect);

        if mismatched {
            tracing::debug!(
                schema = %schema.id,
                dialect = %dialect,
                "selection changed, discarding previous session"
            );
            self.current = None;
            self.messages.clear();
        }

        let next_tag = &mut self.next_tag;
        self.current.get_or_insert_with(|| {
            let tag = *next_tag;
            *next_tag += 1;
            tracing::debug!(schema = %schema.id, dialect = %dialect, tag, "opening session");
            Session::new(tag, schema, dialect)
        })
    }

    /// The live session, if any
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Whether a tag still identifies the live session
    pub fn is_current(&self, tag: SessionTag) -> bool {
        self.current.as_ref().is_some_and(|s| s.tag == tag)
    }

    /// In-memory conversation, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record a completed generation turn
    ///
    /// Appends the user utterance and the assistant reply to both the
    /// display conversation and the session transcript. If `tag` no longer
    /// identifies the live session the result is discarded and `false` is
    /// returned: the reply belongs to a schema or dialect the user has
    /// already navigated away from.
    pub fn append_exchange(
        &mut self,
        tag: SessionTag,
        utterance: &str,
        generation: &SqlGeneration,
    ) -> bool {
        if !self.is_current(tag) {
            tracing::warn!(tag, "discarding generation for a stale session");
            return false;
        }

        let reply = serde_json::to_string(generation).unwrap_or_else(|_| "{}".to_string());
        if let Some(session) = self.current.as_mut() {
            session.record_turn(utterance, reply);
        }

        self.messages.push(ChatMessage::user(utterance));
        self.messages.push(ChatMessage::assistant(generation));
        true
    }

    /// Follow-up suggestions from the most recent assistant entry
    pub fn last_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.suggestions.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the live session and the in-memory conversation
    pub fn clear(&mut self) {
        self.current = None;
        self.messages.clear();
    }
}
