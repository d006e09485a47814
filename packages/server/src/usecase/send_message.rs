//! UseCase: plain chat message
//!
//! A message without a persona is relayed to everyone except the sender and
//! persisted with no response. Empty text is still relayed.

use std::sync::Arc;

use odyssey_shared::time::now_millis;
use serde_json::json;

use crate::domain::{
    ConnectionRegistry, OutboundEnvelope, SessionContext, TranscriptRecord, TranscriptRecorder,
};

use super::{
    error::RouteError,
    support::{display_name, record_transcript, resolve_sender},
};

pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    recorder: Arc<dyn TranscriptRecorder>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        recorder: Arc<dyn TranscriptRecorder>,
    ) -> Self {
        Self { registry, recorder }
    }

    /// Returns the number of peers the message reached.
    pub async fn execute(
        &self,
        session: &SessionContext,
        text: String,
    ) -> Result<usize, RouteError> {
        let sender = resolve_sender(self.registry.as_ref(), &session.connection_id).await;

        let message = OutboundEnvelope::Message {
            username: display_name(sender.as_ref()),
            text: text.clone(),
            target_persona: None,
            timestamp: now_millis(),
        };
        let delivered = self
            .registry
            .broadcast(&message, Some(&session.connection_id))
            .await?;
        tracing::debug!(
            "Message from '{}' delivered to {} peer(s)",
            session.connection_id,
            delivered
        );

        record_transcript(
            self.recorder.as_ref(),
            TranscriptRecord {
                prompt: Some(text),
                response: None,
                token_count: None,
                session_id: session.session_id.clone(),
                metadata: json!({}),
                username: sender,
                event_type: "message".to_string(),
            },
        )
        .await;

        Ok(delivered)
    }
}
