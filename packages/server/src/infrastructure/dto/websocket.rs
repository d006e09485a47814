//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Inbound frame as sent by clients.
///
/// Every field is optional so that any JSON object decodes; the codec
/// decides afterwards whether the object is a usable event. Fields not
/// listed here (the web client also sends its selected `persona`) are
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    #[serde(alias = "is_typing")]
    pub is_typing: Option<bool>,
    #[serde(alias = "target_persona")]
    pub target_persona: Option<String>,
}

/// Outbound frame. The `type` tag is always the first key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "user.joined")]
    UserJoined { username: String },

    #[serde(rename = "user.left")]
    UserLeft { username: String },

    #[serde(rename = "typing", rename_all = "camelCase")]
    Typing { username: String, is_typing: bool },

    #[serde(rename = "message", rename_all = "camelCase")]
    Message {
        username: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_persona: Option<String>,
        timestamp: i64,
    },

    #[serde(rename = "ai", rename_all = "camelCase")]
    Ai {
        persona: String,
        text: String,
        reply_to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_count: Option<u32>,
        timestamp: i64,
    },

    #[serde(rename = "system")]
    System { text: String },
}
