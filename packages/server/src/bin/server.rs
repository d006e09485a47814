//! Odyssey Chat relay server.
//!
//! Relays room messages between WebSocket clients and forwards
//! persona-tagged messages to an OpenAI-compatible model.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin odyssey-server
//! cargo run --bin odyssey-server -- --host 0.0.0.0 --port 3000
//! OPENAI_API_KEY=sk-... cargo run --bin odyssey-server
//! ```
//!
//! Every flag can also be set from the environment or a `.env` file.

use std::{sync::Arc, time::Duration};

use clap::Parser;
use odyssey_server::{
    domain::{AiResponder, SessionId, SessionScope, TranscriptRecorder},
    infrastructure::{
        ai::{DisabledResponder, OpenAiConfig, OpenAiResponder},
        registry::InMemoryConnectionRegistry,
        transcript::{LogTranscriptRecorder, SupabaseConfig, SupabaseTranscriptRecorder},
    },
    ui::Server,
    usecase::{
        AskPersonaUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetRoomStateUseCase, GetSessionHistoryUseCase, JoinParticipantUseCase, RelayTypingUseCase, RouteEventUseCase,
        SendMessageUseCase,
    },
};
use odyssey_shared::logger::setup_logger;

const TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "odyssey-server")]
#[command(about = "Multi-party chat relay with AI personas", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Comma-separated origins allowed by CORS ("*" for any)
    #[arg(
        long = "allowed-origin",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    allowed_origins: Vec<String>,

    /// API key for the AI responder. Persona requests fail without it.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o")]
    openai_model: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    openai_base_url: String,

    /// Seconds to wait for one AI completion
    #[arg(long, env = "AI_TIMEOUT_SECS", default_value = "60")]
    ai_timeout_secs: u64,

    /// Supabase project URL. Transcripts are only logged without it.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    #[arg(long, env = "SUPABASE_TABLE", default_value = "requests")]
    supabase_table: String,

    /// Share one transcript session id across the whole room instead of one per connection
    #[arg(long, env = "ROOM_SESSION_ID")]
    room_session: Option<String>,
}

fn build_responder(args: &Args) -> Arc<dyn AiResponder> {
    let Some(api_key) = args.openai_api_key.clone().filter(|key| !key.trim().is_empty()) else {
        tracing::warn!("OPENAI_API_KEY is not set; persona requests will be answered with an error");
        return Arc::new(DisabledResponder);
    };

    let config = OpenAiConfig {
        api_key,
        model: args.openai_model.clone(),
        base_url: args.openai_base_url.clone(),
        timeout: Duration::from_secs(args.ai_timeout_secs),
    };
    match OpenAiResponder::new(config) {
        Ok(responder) => {
            tracing::info!("AI responder ready (model: {})", responder.model());
            Arc::new(responder)
        }
        Err(e) => {
            tracing::error!("Failed to create AI responder: {}", e);
            Arc::new(DisabledResponder)
        }
    }
}

fn build_recorder(args: &Args) -> Arc<dyn TranscriptRecorder> {
    let (Some(url), Some(key)) = (args.supabase_url.clone(), args.supabase_key.clone()) else {
        tracing::warn!("SUPABASE_URL or SUPABASE_KEY is not set; transcripts will only be logged");
        return Arc::new(LogTranscriptRecorder);
    };

    let config = SupabaseConfig {
        url,
        key,
        table: args.supabase_table.clone(),
        timeout: TRANSCRIPT_TIMEOUT,
    };
    match SupabaseTranscriptRecorder::new(config) {
        Ok(recorder) => Arc::new(recorder),
        Err(e) => {
            tracing::error!("Failed to create transcript recorder: {}", e);
            Arc::new(LogTranscriptRecorder)
        }
    }
}

fn session_scope(args: &Args) -> SessionScope {
    match args.room_session.as_deref().map(SessionId::new) {
        Some(Ok(session_id)) => {
            tracing::info!("All connections share transcript session '{}'", session_id);
            SessionScope::Room(session_id)
        }
        Some(Err(e)) => {
            tracing::warn!("Ignoring ROOM_SESSION_ID: {}", e);
            SessionScope::PerConnection
        }
        None => SessionScope::PerConnection,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // 1. Collaborators
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let responder = build_responder(&args);
    let recorder = build_recorder(&args);

    match recorder.verify_connection().await {
        Ok(()) => tracing::info!("Transcript store connection verified"),
        Err(e) => tracing::warn!("Transcript store check failed: {}", e),
    }

    // 2. UseCases
    let connect_participant_usecase =
        Arc::new(ConnectParticipantUseCase::new(registry.clone()));
    let disconnect_participant_usecase =
        Arc::new(DisconnectParticipantUseCase::new(registry.clone()));
    let route_event_usecase = Arc::new(RouteEventUseCase::new(
        registry.clone(),
        Arc::new(JoinParticipantUseCase::new(
            registry.clone(),
            recorder.clone(),
        )),
        Arc::new(RelayTypingUseCase::new(registry.clone())),
        Arc::new(SendMessageUseCase::new(
            registry.clone(),
            recorder.clone(),
        )),
        Arc::new(AskPersonaUseCase::new(
            registry.clone(),
            responder,
            recorder.clone(),
        )),
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(registry));
    let get_session_history_usecase = Arc::new(GetSessionHistoryUseCase::new(recorder));

    // 3. Server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        route_event_usecase,
        get_room_state_usecase,
        get_session_history_usecase,
    )
    .with_session_scope(session_scope(&args))
    .with_allowed_origins(args.allowed_origins.clone());

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
