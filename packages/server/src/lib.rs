//! Odyssey Chat relay server.
//!
//! Layers, innermost first:
//! - `domain`: value objects, envelopes, personas and collaborator traits
//! - `usecase`: the event router and the use cases it dispatches to
//! - `infrastructure`: wire codec, connection registry, AI and transcript clients
//! - `ui`: axum server, WebSocket and HTTP handlers

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
