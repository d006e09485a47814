//! Conversion logic between DTOs and domain envelopes.

use crate::domain::{InboundEnvelope, OutboundEnvelope};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl dto::InboundMessage {
    /// Interpret a structurally valid frame.
    ///
    /// Returns `None` when the frame is not a usable event (unknown `type`,
    /// `join` without a username, untyped object without `text`); the codec
    /// then falls back to the raw text.
    pub fn into_envelope(self) -> Option<InboundEnvelope> {
        match self.r#type.as_deref() {
            Some("join") => self
                .username
                .map(|username| InboundEnvelope::Join { username }),
            Some("typing") => Some(InboundEnvelope::Typing {
                is_typing: self.is_typing.unwrap_or(false),
            }),
            Some("message") => Some(InboundEnvelope::Message {
                text: self.text.unwrap_or_default(),
                target_persona: self.target_persona,
            }),
            // the web client sends chat lines without a type tag
            None => self.text.map(|text| InboundEnvelope::Message {
                text,
                target_persona: self.target_persona,
            }),
            Some(_) => None,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&OutboundEnvelope> for dto::OutboundMessage {
    fn from(envelope: &OutboundEnvelope) -> Self {
        match envelope {
            OutboundEnvelope::UserJoined { username } => dto::OutboundMessage::UserJoined {
                username: username.as_str().to_string(),
            },
            OutboundEnvelope::UserLeft { username } => dto::OutboundMessage::UserLeft {
                username: username.as_str().to_string(),
            },
            OutboundEnvelope::Typing {
                username,
                is_typing,
            } => dto::OutboundMessage::Typing {
                username: username.clone(),
                is_typing: *is_typing,
            },
            OutboundEnvelope::Message {
                username,
                text,
                target_persona,
                timestamp,
            } => dto::OutboundMessage::Message {
                username: username.clone(),
                text: text.clone(),
                target_persona: target_persona.map(|p| p.name().to_string()),
                timestamp: *timestamp,
            },
            OutboundEnvelope::Ai {
                persona,
                text,
                reply_to,
                token_count,
                timestamp,
            } => dto::OutboundMessage::Ai {
                persona: persona.name().to_string(),
                text: text.clone(),
                reply_to: reply_to.clone(),
                token_count: *token_count,
                timestamp: *timestamp,
            },
            OutboundEnvelope::System { text } => {
                dto::OutboundMessage::System { text: text.clone() }
            }
        }
    }
}
