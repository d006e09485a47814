//! UseCase: inbound event router
//!
//! Dispatches one decoded envelope to the matching use case. Any failure is
//! reported to the requester as a `system` envelope and never to the rest of
//! the room; the connection stays open either way.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, InboundEnvelope, OutboundEnvelope, Persona, SessionContext};

use super::{
    AskPersonaUseCase, JoinParticipantUseCase, RelayTypingUseCase, SendMessageUseCase,
    error::RouteError,
};

pub struct RouteEventUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    join: Arc<JoinParticipantUseCase>,
    typing: Arc<RelayTypingUseCase>,
    send_message: Arc<SendMessageUseCase>,
    ask_persona: Arc<AskPersonaUseCase>,
}

impl RouteEventUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        join: Arc<JoinParticipantUseCase>,
        typing: Arc<RelayTypingUseCase>,
        send_message: Arc<SendMessageUseCase>,
        ask_persona: Arc<AskPersonaUseCase>,
    ) -> Self {
        Self {
            registry,
            join,
            typing,
            send_message,
            ask_persona,
        }
    }

    pub async fn execute(
        &self,
        session: &SessionContext,
        envelope: InboundEnvelope,
    ) -> Result<(), RouteError> {
        let kind = envelope.kind();
        let result = self.dispatch(session, envelope).await;

        if let Err(e) = &result {
            tracing::warn!(
                "Failed to handle {} from '{}': {}",
                kind,
                session.connection_id,
                e
            );
            let notice = OutboundEnvelope::system(e.to_system_text());
            if let Err(push_error) = self.registry.send_to(&session.connection_id, &notice).await
            {
                tracing::error!(
                    "Failed to report error to '{}': {}",
                    session.connection_id,
                    push_error
                );
            }
        }

        result
    }

    async fn dispatch(
        &self,
        session: &SessionContext,
        envelope: InboundEnvelope,
    ) -> Result<(), RouteError> {
        match envelope {
            InboundEnvelope::Join { username } => {
                self.join.execute(session, &username).await?;
            }
            InboundEnvelope::Typing { is_typing } => {
                self.typing.execute(session, is_typing).await?;
            }
            InboundEnvelope::Message {
                text,
                target_persona,
            } => match Persona::resolve(target_persona.as_deref()) {
                Some(persona) => {
                    self.ask_persona
                        .execute(session, persona, &text)
                        .await?;
                }
                None => {
                    if let Some(unknown) = target_persona
                        .as_deref()
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                    {
                        tracing::debug!("Unknown persona '{}', relaying as plain message", unknown);
                    }
                    self.send_message.execute(session, text).await?;
                }
            },
        }
        Ok(())
    }
}
