//! UseCase: 参加者切断処理
//!
//! Runs exactly once per connection, after its loop has ended. A
//! `user.left` notice goes out only if the connection had joined.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, OutboundEnvelope, Username};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Unregister the connection and announce the departure.
    ///
    /// Returns the username the connection had declared, if any.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Username> {
        let username = self.registry.unregister(connection_id).await;
        tracing::info!(
            "Connection '{}' disconnected and removed from registry",
            connection_id
        );

        if let Some(username) = &username {
            let left = OutboundEnvelope::UserLeft {
                username: username.clone(),
            };
            match self.registry.broadcast(&left, None).await {
                Ok(count) => {
                    tracing::info!("Broadcasted user.left for '{}' to {} peers", username, count)
                }
                Err(e) => tracing::warn!("Failed to broadcast user.left: {}", e),
            }
        }

        username
    }
}
