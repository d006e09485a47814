//! Transcript recorder backed by a Supabase (PostgREST) table.
//!
//! Rows are inserted with `POST {url}/rest/v1/{table}` and read back per
//! session with `GET {url}/rest/v1/{table}?session_id=eq.{id}`. Expected columns:
//! `session_id`, `prompt`, `response`, `tokens_used`, `metadata` (jsonb),
//! `username`, `event_type`, `user_id`, `created_at`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use odyssey_shared::time::now_rfc3339;

use crate::{
    domain::{CollaboratorError, SessionId, TranscriptRecord, TranscriptRecorder, Username},
    infrastructure::map_reqwest_error,
};

use super::preview;

/// Stored in the `username` column for senders that never joined.
const ANONYMOUS_USERNAME: &str = "anonymous";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout: Duration,
}

pub struct SupabaseTranscriptRecorder {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

/// Row as stored in the table.
#[derive(Debug, Serialize)]
struct TranscriptRow<'a> {
    prompt: Option<&'a str>,
    response: Option<&'a str>,
    tokens_used: Option<u32>,
    session_id: &'a str,
    metadata: &'a Value,
    username: &'a str,
    event_type: &'a str,
    user_id: Option<&'a str>,
    created_at: String,
}

impl<'a> TranscriptRow<'a> {
    fn from_record(record: &'a TranscriptRecord) -> Self {
        Self {
            prompt: record.prompt.as_deref(),
            response: record.response.as_deref(),
            tokens_used: record.token_count,
            session_id: record.session_id.as_str(),
            metadata: &record.metadata,
            username: record
                .username
                .as_ref()
                .map_or(ANONYMOUS_USERNAME, |name| name.as_str()),
            event_type: &record.event_type,
            user_id: None,
            created_at: now_rfc3339(),
        }
    }
}

/// Row as read back from the table. Columns this server does not use
/// (`id`, `user_id`, `created_at`) are ignored.
#[derive(Debug, Deserialize)]
struct StoredRow {
    prompt: Option<String>,
    response: Option<String>,
    tokens_used: Option<u32>,
    #[serde(default)]
    metadata: Value,
    username: Option<String>,
    event_type: Option<String>,
}

impl StoredRow {
    fn into_record(self, session_id: &SessionId) -> TranscriptRecord {
        TranscriptRecord {
            prompt: self.prompt,
            response: self.response,
            token_count: self.tokens_used,
            session_id: session_id.clone(),
            metadata: match self.metadata {
                Value::Null => json!({}),
                metadata => metadata,
            },
            username: self
                .username
                .filter(|name| name != ANONYMOUS_USERNAME)
                .and_then(|name| Username::new(name).ok()),
            event_type: self.event_type.unwrap_or_else(|| "message".to_string()),
        }
    }
}

impl SupabaseTranscriptRecorder {
    pub fn new(config: SupabaseConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            key: config.key,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CollaboratorError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TranscriptRecorder for SupabaseTranscriptRecorder {
    async fn record(&self, record: TranscriptRecord) -> Result<(), CollaboratorError> {
        let row = TranscriptRow::from_record(&record);
        let response = self
            .authorized(self.client.post(&self.endpoint))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await?;

        tracing::info!(
            "Logged {} event to transcript store (session: {}): {}...",
            record.event_type,
            record.session_id,
            preview(&record)
        );
        Ok(())
    }

    async fn history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TranscriptRecord>, CollaboratorError> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[
                ("session_id", format!("eq.{}", session_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )
        .map_err(|e| CollaboratorError::Request(e.to_string()))?;

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let rows: Vec<StoredRow> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            "Retrieved {} transcript rows for session {}",
            rows.len(),
            session_id
        );
        Ok(rows
            .into_iter()
            .map(|row| row.into_record(session_id))
            .collect())
    }

    async fn verify_connection(&self) -> Result<(), CollaboratorError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}?select=id&limit=1", self.endpoint)),
            )
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}
