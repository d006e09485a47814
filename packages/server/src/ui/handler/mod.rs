//! axum handlers.

mod http;
mod websocket;

pub use http::{get_room, get_session_history, health_check};
pub use websocket::websocket_handler;
