//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::StreamExt,
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, OUTBOUND_QUEUE_CAPACITY},
    infrastructure::codec,
    ui::state::AppState,
    usecase::DisconnectParticipantUseCase,
};

/// How long a closing connection may take to flush frames still queued for it.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Everything the registry routes to this connection (broadcasts, replies,
/// error notices) arrives through `rx`. The loop ends once every sender of
/// `rx` is gone and the queue is empty.
fn pusher_loop<S>(mut rx: mpsc::Receiver<String>, mut sender: S) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id, tx)
        .await
    {
        tracing::error!("Rejecting connection '{}': {}", connection_id, e);
        return;
    }
    let session = state.session_scope.open(connection_id);
    tracing::info!(
        "Connection '{}' opened (session: {})",
        connection_id,
        session.session_id
    );

    let (sender, mut receiver) = socket.split();
    let state_clone = state.clone();

    // Frames from one connection are handled one at a time, in arrival order
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", session.connection_id, text);
                    let envelope = codec::decode(text.as_str());
                    // Errors were already reported to the requester
                    let _ = state_clone
                        .route_event_usecase
                        .execute(&session, envelope)
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", session.connection_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", session.connection_id);
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    let send_task = pusher_loop(rx, sender);

    finish_connection(
        &state.disconnect_participant_usecase,
        connection_id,
        recv_task,
        send_task,
    )
    .await;
}

/// Tear a connection down once either side has stopped.
///
/// When the client side ends first, the connection is unregistered before the
/// pusher is awaited: that drops the registry's sender, so frames queued in
/// the meantime (such as a `system` notice for the last request) are still
/// written before the socket closes.
async fn finish_connection(
    disconnect: &DisconnectParticipantUseCase,
    connection_id: ConnectionId,
    mut recv_task: JoinHandle<()>,
    mut send_task: JoinHandle<()>,
) {
    let left = tokio::select! {
        _ = &mut recv_task => {
            let left = disconnect.execute(&connection_id).await;
            if tokio::time::timeout(DRAIN_TIMEOUT, &mut send_task).await.is_err() {
                tracing::warn!("Dropping undelivered frames for '{}'", connection_id);
                send_task.abort();
            }
            left
        }
        _ = &mut send_task => {
            recv_task.abort();
            disconnect.execute(&connection_id).await
        }
    };

    match left {
        Some(username) => {
            tracing::info!("Connection '{}' ({}) closed", connection_id, username)
        }
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionRegistry, OutboundEnvelope},
        infrastructure::registry::InMemoryConnectionRegistry,
    };

    /// A sink that forwards every text frame to a channel the test reads.
    fn capture() -> (
        impl Sink<Message> + Unpin + Send + 'static,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = futures_util::sink::unfold(tx, |tx, msg: Message| async move {
            if let Message::Text(text) = msg {
                let _ = tx.send(text.as_str().to_string());
            }
            Ok::<_, std::convert::Infallible>(tx)
        });
        (Box::pin(sink), rx)
    }

    #[tokio::test]
    async fn test_queued_frames_flushed_after_client_side_ends() {
        // テスト項目: 受信側が先に終わっても、キューに残ったフレームは送信されてから切断される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let disconnect = DisconnectParticipantUseCase::new(registry.clone());
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry.register(connection_id, tx).await.unwrap();
        registry
            .send_to(&connection_id, &OutboundEnvelope::system("Error: late"))
            .await
            .unwrap();

        let (sink, mut written) = capture();
        let send_task = pusher_loop(rx, sink);
        let recv_task = tokio::spawn(async {});

        // when (操作):
        finish_connection(&disconnect, connection_id, recv_task, send_task).await;

        // then (期待する結果):
        let frame: serde_json::Value = serde_json::from_str(&written.recv().await.unwrap()).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"type": "system", "text": "Error: late"})
        );
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_client_side_stopped_when_socket_write_side_ends() {
        // テスト項目: 送信側が先に終わった場合は受信タスクを止めて登録を解除する
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let disconnect = DisconnectParticipantUseCase::new(registry.clone());
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry.register(connection_id, tx).await.unwrap();

        let send_task = tokio::spawn(async {});
        let recv_task = tokio::spawn(std::future::pending::<()>());

        // when (操作):
        finish_connection(&disconnect, connection_id, recv_task, send_task).await;

        // then (期待する結果):
        assert_eq!(registry.connection_count().await, 0);
    }
}
