//! External collaborators: the AI responder and the transcript store.

use async_trait::async_trait;
use serde_json::Value;

use super::{
    error::CollaboratorError,
    value_object::{SessionId, Username},
};

/// Result of one AI completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub token_count: Option<u32>,
    /// Whatever the provider returned, kept for the transcript.
    pub raw_metadata: Value,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiResponder: Send + Sync {
    /// Ask the model to answer `prompt`, steered by `instructions`.
    ///
    /// Implementations apply their own timeout.
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<Completion, CollaboratorError>;
}

/// One persisted transcript line.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub prompt: Option<String>,
    pub response: Option<String>,
    pub token_count: Option<u32>,
    pub session_id: SessionId,
    pub metadata: Value,
    pub username: Option<Username>,
    /// `"message"`, `"join"`, or the canonical persona name for AI requests.
    pub event_type: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptRecorder: Send + Sync {
    async fn record(&self, record: TranscriptRecord) -> Result<(), CollaboratorError>;

    /// Every record stored under `session_id`, oldest first.
    async fn history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptRecord>, CollaboratorError>;

    /// Startup probe. Never fatal; the caller only logs the outcome.
    async fn verify_connection(&self) -> Result<(), CollaboratorError>;
}
