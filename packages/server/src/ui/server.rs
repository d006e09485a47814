//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    domain::SessionScope,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
        GetSessionHistoryUseCase, RouteEventUseCase,
    },
};

use super::{
    handler::{get_room, get_session_history, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     route_event_usecase,
///     get_room_state_usecase,
///     get_session_history_usecase,
/// )
/// .with_session_scope(SessionScope::PerConnection)
/// .with_allowed_origins(vec!["http://localhost:5173".to_string()]);
/// server.run("127.0.0.1".to_string(), 8000).await?;
/// ```
pub struct Server {
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    route_event_usecase: Arc<RouteEventUseCase>,
    get_room_state_usecase: Arc<GetRoomStateUseCase>,
    get_session_history_usecase: Arc<GetSessionHistoryUseCase>,
    session_scope: SessionScope,
    allowed_origins: Vec<String>,
}

impl Server {
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        route_event_usecase: Arc<RouteEventUseCase>,
        get_room_state_usecase: Arc<GetRoomStateUseCase>,
        get_session_history_usecase: Arc<GetSessionHistoryUseCase>,
    ) -> Self {
        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            route_event_usecase,
            get_room_state_usecase,
            get_session_history_usecase,
            session_scope: SessionScope::default(),
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_session_scope(mut self, session_scope: SessionScope) -> Self {
        self.session_scope = session_scope;
        self
    }

    /// Origins allowed by CORS. `"*"` allows any origin; an empty list
    /// leaves CORS headers off entirely.
    pub fn with_allowed_origins(mut self, allowed_origins: Vec<String>) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }

    /// Build the axum application without binding a socket.
    pub fn router(self) -> Router {
        let cors = cors_layer(&self.allowed_origins);
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            route_event_usecase: self.route_event_usecase,
            get_room_state_usecase: self.get_room_state_usecase,
            get_session_history_usecase: self.get_session_history_usecase,
            session_scope: self.session_scope,
        });

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/room", get(get_room))
            .route("/api/sessions/{session_id}/history", get(get_session_history))
            .with_state(app_state)
            .layer(TraceLayer::new_for_http());

        match cors {
            Some(cors) => app.layer(cors),
            None => app,
        }
    }

    /// Run the relay server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(
            "Odyssey relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
