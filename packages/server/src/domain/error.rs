//! Domain errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username is {len} characters long (max {max})")]
    UsernameTooLong { len: usize, max: usize },

    #[error("session id must not be empty")]
    EmptySessionId,
}

/// Registry misuse. Registering the same connection twice is a bug in the
/// transport layer, not a runtime fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Failure to produce the wire form of an outbound envelope.
///
/// A peer that has gone away is not an error here; those sends are logged
/// and dropped by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("failed to encode outbound envelope: {0}")]
    Encode(String),
}

/// Failure reported by an external collaborator (AI responder or
/// transcript store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{0} is not configured")]
    Unavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("service responded with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}
