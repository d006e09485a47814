//! UseCase: 参加者接続処理
//!
//! A freshly accepted connection is registered with no username. It becomes
//! visible to the room only once it sends `join`.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, PusherChannel, RegistryError};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectParticipantUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Register the connection and its outbound channel.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), ConnectError> {
        self.registry
            .register(connection_id, channel)
            .await
            .map_err(|e| match e {
                RegistryError::AlreadyRegistered(id) => ConnectError::AlreadyRegistered(id),
            })?;

        tracing::info!(
            "Connection '{}' registered ({} open)",
            connection_id,
            self.registry.connection_count().await
        );
        Ok(())
    }
}
