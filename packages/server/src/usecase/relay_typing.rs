//! UseCase: typing indicator relay
//!
//! Ephemeral presence: relayed to everyone else as-is, never persisted and
//! never sent to the AI responder.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, OutboundEnvelope, SessionContext};

use super::{
    error::RouteError,
    support::{display_name, resolve_sender},
};

pub struct RelayTypingUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl RelayTypingUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        session: &SessionContext,
        is_typing: bool,
    ) -> Result<usize, RouteError> {
        let sender = resolve_sender(self.registry.as_ref(), &session.connection_id).await;
        let typing = OutboundEnvelope::Typing {
            username: display_name(sender.as_ref()),
            is_typing,
        };
        Ok(self
            .registry
            .broadcast(&typing, Some(&session.connection_id))
            .await?)
    }
}
