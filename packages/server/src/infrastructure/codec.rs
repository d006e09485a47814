//! Message codec: raw WebSocket text <-> domain envelopes.
//!
//! Decoding never fails. Anything that is not a recognisable JSON event is
//! delivered as a plain chat line carrying the raw text, which keeps legacy
//! text-only clients working.

use crate::{
    domain::{InboundEnvelope, MessagePushError, OutboundEnvelope},
    infrastructure::dto::websocket::{InboundMessage, OutboundMessage},
};

pub fn decode(raw: &str) -> InboundEnvelope {
    match serde_json::from_str::<InboundMessage>(raw) {
        Ok(message) => message.into_envelope().unwrap_or_else(|| {
            tracing::debug!("Unrecognised event, treating as plain text");
            InboundEnvelope::plain(raw)
        }),
        Err(e) => {
            tracing::debug!("Failed to parse message as JSON ({}), treating as plain text", e);
            InboundEnvelope::plain(raw)
        }
    }
}

/// Canonical JSON for an outbound envelope. Output is deterministic for a
/// given envelope.
pub fn encode(envelope: &OutboundEnvelope) -> Result<String, MessagePushError> {
    serde_json::to_string(&OutboundMessage::from(envelope))
        .map_err(|e| MessagePushError::Encode(e.to_string()))
}
