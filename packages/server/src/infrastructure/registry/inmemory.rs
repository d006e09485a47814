//! In-memory `ConnectionRegistry` implementation.
//!
//! ## 責務
//!
//! - Keep the outbound channel and declared username of each live connection
//! - Deliver encoded envelopes to one connection or to the whole room
//!
//! ## 設計ノート
//!
//! The socket itself is owned by the UI layer (`ui::handler::websocket`);
//! this registry only holds the sending half of the channel that the
//! socket's pusher task drains. Removing an entry never closes anything.
//!
//! `broadcast` copies the target channels out under the lock and sends after
//! releasing it, so joins and leaves that race with a broadcast neither wait
//! for it nor receive a duplicate.
//!
//! Sends never wait: a frame for a peer whose queue is full is dropped and
//! logged, so one slow reader cannot stall the room.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{
        ConnectionId, ConnectionRegistry, MessagePushError, OutboundEnvelope, PusherChannel,
        RegistryError, Username,
    },
    infrastructure::codec,
};

struct ConnectionEntry {
    channel: PusherChannel,
    username: Option<Username>,
}

#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn push(connection_id: &ConnectionId, channel: &PusherChannel, payload: &str) -> bool {
    match channel.try_send(payload.to_string()) {
        Ok(()) => {
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(
                "Outbound queue of connection '{}' is full, dropping message",
                connection_id
            );
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::warn!(
                "Failed to push message to connection '{}': channel closed",
                connection_id
            );
            false
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection_id) {
            return Err(RegistryError::AlreadyRegistered(connection_id.to_string()));
        }
        connections.insert(
            connection_id,
            ConnectionEntry {
                channel,
                username: None,
            },
        );
        tracing::debug!("Connection '{}' registered", connection_id);
        Ok(())
    }

    async fn set_username(&self, connection_id: &ConnectionId, username: Username) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get_mut(connection_id) {
            Some(entry) => {
                tracing::debug!("Connection '{}' is now '{}'", connection_id, username);
                entry.username = Some(username);
                true
            }
            None => false,
        }
    }

    async fn username_of(&self, connection_id: &ConnectionId) -> Option<Username> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .and_then(|entry| entry.username.clone())
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Username> {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id);
        if removed.is_some() {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
        removed.and_then(|entry| entry.username)
    }

    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        envelope: &OutboundEnvelope,
    ) -> Result<(), MessagePushError> {
        let payload = codec::encode(envelope)?;
        let channel = {
            let connections = self.connections.lock().await;
            connections
                .get(connection_id)
                .map(|entry| entry.channel.clone())
        };

        match channel {
            Some(channel) => {
                push(connection_id, &channel, &payload);
            }
            None => {
                tracing::warn!(
                    "Connection '{}' not found, dropping message",
                    connection_id
                );
            }
        }
        Ok(())
    }

    async fn broadcast(
        &self,
        envelope: &OutboundEnvelope,
        exclude: Option<&ConnectionId>,
    ) -> Result<usize, MessagePushError> {
        let payload = codec::encode(envelope)?;
        let targets: Vec<(ConnectionId, PusherChannel)> = {
            let connections = self.connections.lock().await;
            connections
                .iter()
                .filter(|(id, _)| Some(*id) != exclude)
                .map(|(id, entry)| (*id, entry.channel.clone()))
                .collect()
        };

        // ブロードキャストでは一部の送信失敗を許容
        let delivered = targets
            .iter()
            .filter(|(id, channel)| push(id, channel, &payload))
            .count();

        Ok(delivered)
    }

    async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    async fn usernames(&self) -> Vec<Username> {
        let connections = self.connections.lock().await;
        let mut usernames: Vec<Username> = connections
            .values()
            .filter_map(|entry| entry.username.clone())
            .collect();
        usernames.sort();
        usernames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OUTBOUND_QUEUE_CAPACITY;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 登録・ユーザー名設定・登録解除
    // - send_to: 特定の接続への送信（失敗は握りつぶす）
    // - broadcast: 除外指定付きの全体送信、一部失敗の許容
    //
    // 【なぜこのテストが必要か】
    // - Registry は接続ごとのループが共有する唯一の状態
    // - 送信失敗が他の接続や呼び出し元に波及しないことを保証する
    // ========================================

    fn system(text: &str) -> OutboundEnvelope {
        OutboundEnvelope::system(text)
    }

    async fn register(
        registry: &InMemoryConnectionRegistry,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry.register(id, tx).await.unwrap();
        (id, rx)
    }

    #[tokio::test]
    async fn test_register_twice_fails() {
        // テスト項目: 同じ接続を二重登録するとエラーになる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (id, _rx) = register(&registry).await;
        let (tx, _rx2) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

        // when (操作):
        let result = registry.register(id, tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::AlreadyRegistered(id.to_string())));
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_new_connection_has_no_username() {
        // テスト項目: 登録直後の接続にはユーザー名が無い
        let registry = InMemoryConnectionRegistry::new();
        let (id, _rx) = register(&registry).await;

        assert_eq!(registry.username_of(&id).await, None);
        assert!(registry.usernames().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_username_overwrites() {
        // テスト項目: ユーザー名の再設定は上書きになる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (id, _rx) = register(&registry).await;

        // when (操作):
        assert!(registry.set_username(&id, Username::new("alice").unwrap()).await);
        assert!(registry.set_username(&id, Username::new("alicia").unwrap()).await);

        // then (期待する結果):
        assert_eq!(
            registry.username_of(&id).await,
            Some(Username::new("alicia").unwrap())
        );
    }

    #[tokio::test]
    async fn test_set_username_for_unknown_connection() {
        let registry = InMemoryConnectionRegistry::new();
        let unknown = ConnectionId::generate();

        assert!(!registry.set_username(&unknown, Username::new("ghost").unwrap()).await);
    }

    #[tokio::test]
    async fn test_unregister_returns_username_once() {
        // テスト項目: 登録解除はユーザー名を一度だけ返す
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (id, _rx) = register(&registry).await;
        registry
            .set_username(&id, Username::new("alice").unwrap())
            .await;

        // when (操作):
        let first = registry.unregister(&id).await;
        let second = registry.unregister(&id).await;

        // then (期待する結果):
        assert_eq!(first, Some(Username::new("alice").unwrap()));
        assert_eq!(second, None);
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_unregister_anonymous_returns_none() {
        let registry = InMemoryConnectionRegistry::new();
        let (id, _rx) = register(&registry).await;

        assert_eq!(registry.unregister(&id).await, None);
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_to_success() {
        // テスト項目: 特定の接続にエンコード済みメッセージが届く
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (id, mut rx) = register(&registry).await;

        // when (操作):
        let result = registry.send_to(&id, &system("hello")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"system","text":"hello"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection_is_swallowed() {
        // テスト項目: 存在しない接続への送信はエラーにならない
        let registry = InMemoryConnectionRegistry::new();

        let result = registry
            .send_to(&ConnectionId::generate(), &system("hello"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_to_closed_peer_keeps_registration() {
        // テスト項目: 切断済みの相手への送信失敗では登録が削除されない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (id, rx) = register(&registry).await;
        drop(rx);

        // when (操作):
        let result = registry.send_to(&id, &system("hello")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        // テスト項目: 除外指定した接続以外の全員に届く
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (alice, mut rx_alice) = register(&registry).await;
        let (_bob, mut rx_bob) = register(&registry).await;
        let (_carol, mut rx_carol) = register(&registry).await;

        // when (操作):
        let delivered = registry
            .broadcast(&system("hi"), Some(&alice))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert!(rx_bob.recv().await.is_some());
        assert!(rx_carol.recv().await.is_some());
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_exclusion_reaches_everyone() {
        let registry = InMemoryConnectionRegistry::new();
        let (_a, mut rx_a) = register(&registry).await;
        let (_b, mut rx_b) = register(&registry).await;

        let delivered = registry.broadcast(&system("all"), None).await.unwrap();

        assert_eq!(delivered, 2);
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の相手が切断済みでも残りには届く
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (_alice, rx_alice) = register(&registry).await;
        let (_bob, mut rx_bob) = register(&registry).await;
        drop(rx_alice);

        // when (操作):
        let result = registry.broadcast(&system("still here"), None).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(rx_bob.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_skips_unregistered() {
        // テスト項目: ブロードキャスト前に登録解除された接続には届かない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (alice, mut rx_alice) = register(&registry).await;
        let (_bob, mut rx_bob) = register(&registry).await;
        registry.unregister(&alice).await;

        // when (操作):
        registry.broadcast(&system("bye"), None).await.unwrap();

        // then (期待する結果):
        assert!(rx_bob.recv().await.is_some());
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_usernames_sorted_and_skip_anonymous() {
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (c, _rx_c) = register(&registry).await;
        let (a, _rx_a) = register(&registry).await;
        let (_anon, _rx_anon) = register(&registry).await;
        registry.set_username(&c, Username::new("carol").unwrap()).await;
        registry.set_username(&a, Username::new("alice").unwrap()).await;

        // when (操作):
        let usernames = registry.usernames().await;

        // then (期待する結果):
        assert_eq!(
            usernames,
            vec![Username::new("alice").unwrap(), Username::new("carol").unwrap()]
        );
        assert_eq!(registry.connection_count().await, 3);
    }

    #[tokio::test]
    async fn test_full_queue_drops_frames_without_blocking() {
        // テスト項目: 読み出しが止まった接続のキューが満杯なら、その接続への送信だけが捨てられる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let slow = ConnectionId::generate();
        let (tx, mut rx_slow) = mpsc::channel(2);
        registry.register(slow, tx).await.unwrap();
        let (_fast, mut rx_fast) = register(&registry).await;

        // when (操作):
        let mut delivered = Vec::new();
        for text in ["one", "two", "three"] {
            delivered.push(registry.broadcast(&system(text), None).await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(delivered, vec![2, 2, 1]);
        assert_eq!(registry.connection_count().await, 2);
        for _ in 0..3 {
            assert!(rx_fast.recv().await.is_some());
        }
        assert!(rx_slow.recv().await.unwrap().contains("one"));
        assert!(rx_slow.recv().await.unwrap().contains("two"));
        assert!(rx_slow.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_register_and_broadcast() {
        // テスト項目: 並行した登録とブロードキャストでデッドロックしない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut receivers = Vec::new();
        let mut handles = Vec::new();

        // when (操作):
        for _ in 0..32 {
            let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
            receivers.push(rx);
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let id = ConnectionId::generate();
                registry.register(id, tx).await.unwrap();
                registry.broadcast(&system("ping"), Some(&id)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(registry.connection_count().await, 32);
    }
}
