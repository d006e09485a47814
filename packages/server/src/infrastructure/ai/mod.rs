//! AI responder implementations.
//!
//! - `openai`: OpenAI-compatible chat completions over HTTP
//! - `disabled`: used when no API key is configured

pub mod disabled;
pub mod openai;

pub use disabled::DisabledResponder;
pub use openai::{OpenAiConfig, OpenAiResponder};
