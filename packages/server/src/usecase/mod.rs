//! UseCase layer: the router and the per-event use cases it dispatches to.
//!
//! Use cases only talk to the domain traits (`ConnectionRegistry`,
//! `AiResponder`, `TranscriptRecorder`); they never touch a socket.

mod ask_persona;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_state;
mod get_session_history;
mod join_participant;
mod relay_typing;
mod route_event;
mod send_message;
mod support;

pub use ask_persona::AskPersonaUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, HistoryError, RouteError};
pub use get_room_state::{GetRoomStateUseCase, RoomState};
pub use get_session_history::GetSessionHistoryUseCase;
pub use join_participant::JoinParticipantUseCase;
pub use relay_typing::RelayTypingUseCase;
pub use route_event::RouteEventUseCase;
pub use send_message::SendMessageUseCase;
pub use support::ANONYMOUS;

#[cfg(test)]
pub(crate) mod test_support;
