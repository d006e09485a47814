//! Protocol envelopes, independent of the wire format.

use super::{persona::Persona, value_object::Username};

/// A decoded inbound event.
///
/// Undecodable input never shows up here as an error: the codec turns it
/// into a [`InboundEnvelope::Message`] carrying the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEnvelope {
    /// Declares or replaces the sender's display name. Validated by the
    /// router, not by the codec.
    Join { username: String },
    /// Any `username` on the frame is dropped: the sender is whoever the
    /// connection joined as.
    Typing { is_typing: bool },
    Message {
        text: String,
        target_persona: Option<String>,
    },
}

impl InboundEnvelope {
    /// Legacy form: plain text from a client that does not speak JSON.
    pub fn plain(text: impl Into<String>) -> Self {
        InboundEnvelope::Message {
            text: text.into(),
            target_persona: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEnvelope::Join { .. } => "join",
            InboundEnvelope::Typing { .. } => "typing",
            InboundEnvelope::Message { .. } => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEnvelope {
    UserJoined {
        username: Username,
    },
    UserLeft {
        username: Username,
    },
    Typing {
        username: String,
        is_typing: bool,
    },
    Message {
        username: String,
        text: String,
        target_persona: Option<Persona>,
        timestamp: i64,
    },
    Ai {
        persona: Persona,
        text: String,
        reply_to: String,
        token_count: Option<u32>,
        timestamp: i64,
    },
    System {
        text: String,
    },
}

impl OutboundEnvelope {
    pub fn system(text: impl Into<String>) -> Self {
        OutboundEnvelope::System { text: text.into() }
    }
}
