//! Helpers shared by the routing use cases.

use crate::domain::{
    ConnectionId, ConnectionRegistry, TranscriptRecord, TranscriptRecorder, Username,
};

/// Label shown for connections that never joined.
pub const ANONYMOUS: &str = "anonymous";

/// Who is speaking on `connection_id`: the name it declared with `join`,
/// or `None` if it never joined. A `username` field on the frame itself
/// is never trusted.
pub(crate) async fn resolve_sender(
    registry: &dyn ConnectionRegistry,
    connection_id: &ConnectionId,
) -> Option<Username> {
    registry.username_of(connection_id).await
}

pub(crate) fn display_name(sender: Option<&Username>) -> String {
    sender.map_or(ANONYMOUS, Username::as_str).to_string()
}

/// Persist a transcript line. Failures are logged and never reach a client.
pub(crate) async fn record_transcript(recorder: &dyn TranscriptRecorder, record: TranscriptRecord) {
    let event_type = record.event_type.clone();
    if let Err(e) = recorder.record(record).await {
        tracing::warn!("Failed to record {} transcript: {}", event_type, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::OUTBOUND_QUEUE_CAPACITY, infrastructure::registry::InMemoryConnectionRegistry};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_joined_name_is_the_sender() {
        // テスト項目: join で宣言した名前が送信者名になる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry.register(id, tx).await.unwrap();
        registry.set_username(&id, Username::new("alice").unwrap()).await;

        // when (操作):
        let sender = resolve_sender(&registry, &id).await;

        // then (期待する結果):
        assert_eq!(sender, Some(Username::new("alice").unwrap()));
        assert_eq!(display_name(sender.as_ref()), "alice");
    }

    #[tokio::test]
    async fn test_unjoined_connection_is_anonymous() {
        // テスト項目: join していない接続は anonymous として扱われる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry.register(id, tx).await.unwrap();

        // when (操作):
        let sender = resolve_sender(&registry, &id).await;

        // then (期待する結果):
        assert_eq!(sender, None);
        assert_eq!(display_name(sender.as_ref()), ANONYMOUS);
    }
}
