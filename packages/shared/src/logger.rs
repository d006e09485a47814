//! Logging setup for the Odyssey Chat binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter used when `RUST_LOG` is not set.
///
/// Both the library crates and the binary log at `default_log_level`;
/// everything else (hyper, tungstenite, ...) stays at `warn`.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "warn,odyssey_server={level},odyssey_shared={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use odyssey_shared::logger::setup_logger;
///
/// setup_logger("odyssey-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
