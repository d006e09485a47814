//! Fixtures shared by the use case tests.

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        CollaboratorError, ConnectionId, ConnectionRegistry, OUTBOUND_QUEUE_CAPACITY,
        SessionContext, SessionId, TranscriptRecord, TranscriptRecorder, Username,
    },
    infrastructure::{dto::websocket::OutboundMessage, registry::InMemoryConnectionRegistry},
};

/// Transcript recorder that keeps everything in memory.
#[derive(Default)]
pub(crate) struct RecordingTranscriptRecorder {
    records: Mutex<Vec<TranscriptRecord>>,
}

impl RecordingTranscriptRecorder {
    pub(crate) async fn records(&self) -> Vec<TranscriptRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl TranscriptRecorder for RecordingTranscriptRecorder {
    async fn record(&self, record: TranscriptRecord) -> Result<(), CollaboratorError> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptRecord>, CollaboratorError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|record| &record.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn verify_connection(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// A registered connection whose outbound channel the test reads directly.
pub(crate) struct TestPeer {
    pub(crate) session: SessionContext,
    rx: mpsc::Receiver<String>,
}

impl TestPeer {
    pub(crate) fn id(&self) -> ConnectionId {
        self.session.connection_id
    }

    /// Everything delivered so far, decoded.
    pub(crate) fn drain(&mut self) -> Vec<OutboundMessage> {
        let mut received = Vec::new();
        while let Ok(text) = self.rx.try_recv() {
            received.push(serde_json::from_str(&text).expect("outbound frame is valid JSON"));
        }
        received
    }
}

pub(crate) async fn connect_peer(registry: &InMemoryConnectionRegistry) -> TestPeer {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    registry.register(connection_id, tx).await.unwrap();
    TestPeer {
        session: SessionContext {
            connection_id,
            session_id: SessionId::new(format!("session-{}", connection_id)).unwrap(),
        },
        rx,
    }
}

pub(crate) async fn join_peer(registry: &InMemoryConnectionRegistry, name: &str) -> TestPeer {
    let peer = connect_peer(registry).await;
    registry
        .set_username(&peer.id(), Username::new(name).unwrap())
        .await;
    peer
}
