//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateDto {
    /// Every open connection, joined or not.
    pub connections: usize,
    /// Usernames of joined connections, sorted.
    pub participants: Vec<String>,
}

/// One transcript line as returned by `GET /api/sessions/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntryDto {
    pub session_id: String,
    pub event_type: String,
    pub username: Option<String>,
    pub prompt: Option<String>,
    pub response: Option<String>,
    pub token_count: Option<u32>,
    pub metadata: serde_json::Value,
}
