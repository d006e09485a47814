//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::SessionScope,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
        GetSessionHistoryUseCase, RouteEventUseCase,
    },
};

pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub route_event_usecase: Arc<RouteEventUseCase>,
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
    pub get_session_history_usecase: Arc<GetSessionHistoryUseCase>,
    /// How transcript session ids are assigned to new connections.
    pub session_scope: SessionScope,
}
