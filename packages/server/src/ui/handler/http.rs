//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{RoomStateDto, TranscriptEntryDto},
    ui::state::AppState,
    usecase::HistoryError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current connection count and joined participants
pub async fn get_room(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    let room = state.get_room_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RoomStateDto {
        connections: room.connections,
        participants: room
            .participants
            .into_iter()
            .map(|username| username.into_string())
            .collect(),
    })
}

/// Transcript of one session, oldest first
pub async fn get_session_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<TranscriptEntryDto>>, StatusCode> {
    match state.get_session_history_usecase.execute(&session_id).await {
        Ok(records) => {
            // Domain Model から DTO への変換
            let entries = records
                .into_iter()
                .map(|record| TranscriptEntryDto {
                    session_id: record.session_id.as_str().to_string(),
                    event_type: record.event_type,
                    username: record.username.map(|username| username.into_string()),
                    prompt: record.prompt,
                    response: record.response,
                    token_count: record.token_count,
                    metadata: record.metadata,
                })
                .collect();
            Ok(Json(entries))
        }
        Err(HistoryError::InvalidSessionId(_)) => Err(StatusCode::BAD_REQUEST),
        Err(HistoryError::Store(e)) => {
            tracing::warn!("Failed to load history of session '{}': {}", session_id, e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
