//! UseCase: transcript history of one session

use std::sync::Arc;

use crate::domain::{SessionId, TranscriptRecord, TranscriptRecorder};

use super::error::HistoryError;

pub struct GetSessionHistoryUseCase {
    recorder: Arc<dyn TranscriptRecorder>,
}

impl GetSessionHistoryUseCase {
    pub fn new(recorder: Arc<dyn TranscriptRecorder>) -> Self {
        Self { recorder }
    }

    pub async fn execute(&self, session_id: &str) -> Result<Vec<TranscriptRecord>, HistoryError> {
        let session_id = SessionId::new(session_id)?;
        Ok(self.recorder.history(&session_id).await?)
    }
}
