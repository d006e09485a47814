//! UseCase: room snapshot for the HTTP API

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Username};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    /// Open connections, joined or not.
    pub connections: usize,
    /// Joined usernames, sorted.
    pub participants: Vec<Username>,
}

pub struct GetRoomStateUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomStateUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> RoomState {
        RoomState {
            connections: self.registry.connection_count().await,
            participants: self.registry.usernames().await,
        }
    }
}
