//! Log-only transcript recorder.

use async_trait::async_trait;

use crate::domain::{CollaboratorError, SessionId, TranscriptRecord, TranscriptRecorder};

use super::preview;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogTranscriptRecorder;

#[async_trait]
impl TranscriptRecorder for LogTranscriptRecorder {
    async fn record(&self, record: TranscriptRecord) -> Result<(), CollaboratorError> {
        tracing::info!(
            "Transcript store not configured; {} event from '{}' would have been saved (session: {}): {}...",
            record.event_type,
            record
                .username
                .as_ref()
                .map_or("anonymous", |name| name.as_str()),
            record.session_id,
            preview(&record)
        );
        Ok(())
    }

    async fn history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptRecord>, CollaboratorError> {
        tracing::debug!(
            "Transcript store not configured; no history for session {}",
            session_id
        );
        Ok(Vec::new())
    }

    async fn verify_connection(&self) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::Unavailable("transcript store".to_string()))
    }
}
