//! UseCase: join (display name declaration)

use std::sync::Arc;

use serde_json::json;

use crate::domain::{
    ConnectionRegistry, OutboundEnvelope, SessionContext, TranscriptRecord, TranscriptRecorder,
    Username,
};

use super::{error::RouteError, support::record_transcript};

pub struct JoinParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    recorder: Arc<dyn TranscriptRecorder>,
}

impl JoinParticipantUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        recorder: Arc<dyn TranscriptRecorder>,
    ) -> Self {
        Self { registry, recorder }
    }

    /// Set (or replace) the sender's username and tell everyone else.
    ///
    /// Returns the number of peers notified.
    pub async fn execute(
        &self,
        session: &SessionContext,
        username: &str,
    ) -> Result<usize, RouteError> {
        let username = Username::new(username)?;

        if !self
            .registry
            .set_username(&session.connection_id, username.clone())
            .await
        {
            tracing::warn!(
                "Join from unregistered connection '{}' ignored",
                session.connection_id
            );
            return Ok(0);
        }
        tracing::info!("Connection '{}' joined as '{}'", session.connection_id, username);

        let joined = OutboundEnvelope::UserJoined {
            username: username.clone(),
        };
        let notified = self
            .registry
            .broadcast(&joined, Some(&session.connection_id))
            .await?;

        record_transcript(
            self.recorder.as_ref(),
            TranscriptRecord {
                prompt: None,
                response: None,
                token_count: None,
                session_id: session.session_id.clone(),
                metadata: json!({}),
                username: Some(username),
                event_type: "join".to_string(),
            },
        )
        .await;

        Ok(notified)
    }
}
