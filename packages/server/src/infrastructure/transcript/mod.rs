//! Transcript recorder implementations.
//!
//! - `supabase`: inserts rows through a PostgREST endpoint (Supabase)
//! - `log`: used when no store is configured; only logs what would be saved

pub mod log;
pub mod supabase;

pub use log::LogTranscriptRecorder;
pub use supabase::{SupabaseConfig, SupabaseTranscriptRecorder};

use crate::domain::TranscriptRecord;

const PREVIEW_CHARS: usize = 50;

/// Short prefix of the prompt (or response) for log lines.
pub(crate) fn preview(record: &TranscriptRecord) -> String {
    record
        .prompt
        .as_deref()
        .or(record.response.as_deref())
        .unwrap_or_default()
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}
