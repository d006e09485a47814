//! UseCase: message addressed to a persona
//!
//! The AI is asked first. Only when it answers does the room see anything:
//! the user's line goes to everyone else, then the reply goes to everyone
//! including the requester. A failed request leaves the room untouched and
//! surfaces as an error for the router to report to the requester alone.

use std::sync::Arc;

use odyssey_shared::time::now_millis;

use crate::domain::{
    AiResponder, ConnectionRegistry, OutboundEnvelope, Persona, SessionContext, TranscriptRecord,
    TranscriptRecorder,
};

use super::{
    error::RouteError,
    support::{display_name, record_transcript, resolve_sender},
};

pub struct AskPersonaUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    responder: Arc<dyn AiResponder>,
    recorder: Arc<dyn TranscriptRecorder>,
}

impl AskPersonaUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        responder: Arc<dyn AiResponder>,
        recorder: Arc<dyn TranscriptRecorder>,
    ) -> Self {
        Self {
            registry,
            responder,
            recorder,
        }
    }

    pub async fn execute(
        &self,
        session: &SessionContext,
        persona: Persona,
        text: &str,
    ) -> Result<(), RouteError> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(RouteError::EmptyPrompt { persona });
        }

        let sender = resolve_sender(self.registry.as_ref(), &session.connection_id).await;
        let label = display_name(sender.as_ref());

        tracing::info!("Asking {} on behalf of '{}'", persona, label);
        let completion = self
            .responder
            .complete(persona.instructions(), prompt)
            .await
            .map_err(|source| {
                tracing::warn!("{} request from '{}' failed: {}", persona, label, source);
                RouteError::Collaborator { persona, source }
            })?;

        let question = OutboundEnvelope::Message {
            username: label.clone(),
            text: prompt.to_string(),
            target_persona: Some(persona),
            timestamp: now_millis(),
        };
        self.registry
            .broadcast(&question, Some(&session.connection_id))
            .await?;

        let answer = OutboundEnvelope::Ai {
            persona,
            text: completion.text.clone(),
            reply_to: label,
            token_count: completion.token_count,
            timestamp: now_millis(),
        };
        self.registry.broadcast(&answer, None).await?;

        record_transcript(
            self.recorder.as_ref(),
            TranscriptRecord {
                prompt: Some(prompt.to_string()),
                response: Some(completion.text),
                token_count: completion.token_count,
                session_id: session.session_id.clone(),
                metadata: completion.raw_metadata,
                username: sender,
                event_type: persona.name().to_string(),
            },
        )
        .await;

        Ok(())
    }
}
