//! Connection registry trait.
//!
//! The registry is the only state shared between per-connection loops. It
//! holds a non-owning handle (an outbound channel) for each live connection
//! plus the username declared by that connection, and exposes only atomic
//! operations: callers never iterate the membership themselves.
//!
//! ## 依存性の逆転（DIP）
//!
//! The trait lives in the domain layer; the in-memory implementation lives in
//! `infrastructure::registry`.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    envelope::OutboundEnvelope,
    error::{MessagePushError, RegistryError},
    value_object::{ConnectionId, Username},
};

/// Outbound text channel of one connection. The transport drains it into
/// the socket; dropping the receiver is how a closed peer shows up.
///
/// The channel is bounded by [`OUTBOUND_QUEUE_CAPACITY`]. A peer that stops
/// reading loses frames once its queue is full instead of growing it.
pub type PusherChannel = mpsc::Sender<String>;

/// Frames that may wait for one connection's socket before new ones are dropped.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection with no username.
    async fn register(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), RegistryError>;

    /// Set or overwrite the display name. Returns `false` when the
    /// connection is not registered.
    async fn set_username(&self, connection_id: &ConnectionId, username: Username) -> bool;

    async fn username_of(&self, connection_id: &ConnectionId) -> Option<Username>;

    /// Remove a connection, returning the username it had declared.
    ///
    /// Removing an unknown connection is a no-op returning `None`, so a
    /// second call never produces a second `user.left`.
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Username>;

    /// Best-effort delivery to one connection. A missing or closed peer is
    /// logged and swallowed; only an encoding failure is returned.
    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        envelope: &OutboundEnvelope,
    ) -> Result<(), MessagePushError>;

    /// Deliver to every connection registered at call time except `exclude`.
    ///
    /// Returns the number of peers the envelope was handed to.
    async fn broadcast(
        &self,
        envelope: &OutboundEnvelope,
        exclude: Option<&ConnectionId>,
    ) -> Result<usize, MessagePushError>;

    async fn connection_count(&self) -> usize;

    /// Usernames of all joined connections, sorted.
    async fn usernames(&self) -> Vec<Username>;
}
