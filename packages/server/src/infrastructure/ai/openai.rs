//! OpenAI-compatible chat completions client.
//!
//! The persona instructions go in as the `system` message and the user's
//! text as the `user` message. Any server speaking the same API (a proxy,
//! a local model gateway) works by pointing `base_url` at it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    domain::{AiResponder, CollaboratorError, Completion},
    infrastructure::map_reqwest_error,
};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub timeout: Duration,
}

pub struct OpenAiResponder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiResponder {
    pub fn new(config: OpenAiConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u32>,
}

fn build_request_body(model: &str, instructions: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": instructions },
            { "role": "user", "content": prompt },
        ],
    })
}

fn parse_completion(body: Value) -> Result<Completion, CollaboratorError> {
    let parsed: ChatCompletionResponse = serde_json::from_value(body.clone())
        .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CollaboratorError::InvalidResponse("no completion text".to_string()))?;

    Ok(Completion {
        text,
        token_count: parsed.usage.and_then(|usage| usage.total_tokens),
        raw_metadata: body,
    })
}

#[async_trait]
impl AiResponder for OpenAiResponder {
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<Completion, CollaboratorError> {
        tracing::info!("Calling {} (model: {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_request_body(&self.model, instructions, prompt))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await.map_err(map_reqwest_error)?;
        let completion = parse_completion(body)?;
        tracing::info!(
            "Completion received ({} tokens)",
            completion
                .token_count
                .map_or_else(|| "?".to_string(), |n| n.to_string())
        );
        Ok(completion)
    }
}
