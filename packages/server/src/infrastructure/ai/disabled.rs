//! Responder used when the deployment has no AI credentials.

use async_trait::async_trait;

use crate::domain::{AiResponder, CollaboratorError, Completion};

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledResponder;

#[async_trait]
impl AiResponder for DisabledResponder {
    async fn complete(
        &self,
        _instructions: &str,
        _prompt: &str,
    ) -> Result<Completion, CollaboratorError> {
        Err(CollaboratorError::Unavailable("AI responder".to_string()))
    }
}
