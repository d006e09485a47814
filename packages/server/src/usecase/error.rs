//! UseCase errors.

use thiserror::Error;

use crate::domain::{CollaboratorError, MessagePushError, Persona, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] ValueObjectError),

    #[error("transcript store failed: {0}")]
    Store(#[from] CollaboratorError),
}

/// Failure while handling one inbound envelope.
///
/// None of these end the connection: the router turns them into a `system`
/// envelope for the requester and moves on to the next frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] ValueObjectError),

    #[error("message for {persona} is empty")]
    EmptyPrompt { persona: Persona },

    #[error("{persona} could not answer: {source}")]
    Collaborator {
        persona: Persona,
        #[source]
        source: CollaboratorError,
    },

    #[error(transparent)]
    Push(#[from] MessagePushError),
}

impl RouteError {
    /// Text of the `system` envelope sent back to the requester.
    pub fn to_system_text(&self) -> String {
        format!("Error: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_text_for_timeout() {
        // テスト項目: タイムアウトのエラーメッセージ
        // given (前提条件):
        let error = RouteError::Collaborator {
            persona: Persona::Hermes,
            source: CollaboratorError::Timeout,
        };

        // when (操作):
        let text = error.to_system_text();

        // then (期待する結果):
        assert_eq!(text, "Error: Hermes could not answer: request timed out");
    }

    #[test]
    fn test_system_text_for_empty_prompt() {
        let error = RouteError::EmptyPrompt {
            persona: Persona::Zeus,
        };

        assert_eq!(error.to_system_text(), "Error: message for Zeus is empty");
    }

    #[test]
    fn test_system_text_for_invalid_username() {
        let error = RouteError::from(ValueObjectError::EmptyUsername);

        assert_eq!(
            error.to_system_text(),
            "Error: invalid username: username must not be empty"
        );
    }
}
