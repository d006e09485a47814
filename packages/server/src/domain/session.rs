//! Transcript session scoping.

use super::value_object::{ConnectionId, SessionId};

/// How transcript session ids are assigned. Chosen per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionScope {
    /// A fresh random id for every connection.
    #[default]
    PerConnection,
    /// One fixed id shared by the whole room.
    Room(SessionId),
}

impl SessionScope {
    pub fn open(&self, connection_id: ConnectionId) -> SessionContext {
        let session_id = match self {
            SessionScope::PerConnection => SessionId::random(),
            SessionScope::Room(id) => id.clone(),
        };
        SessionContext {
            connection_id,
            session_id,
        }
    }
}

/// What the router knows about the connection it is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub connection_id: ConnectionId,
    pub session_id: SessionId,
}
