//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the MediTrip navigation core.

use std::path::Path;

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{MeditripError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| MeditripError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(Path::new(dir), "meditrip.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MeditripError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a completed page transition
pub fn log_navigation(from: &str, to: &str, path: Option<&str>, origin: &str) {
    info!(
        from = from,
        to = to,
        path = path,
        origin = origin,
        "Page transition applied"
    );
}

/// Log session lifecycle events
pub fn log_session_event(session_id: &str, event: &str, details: Option<&str>) {
    debug!(
        session_id = session_id,
        event = event,
        details = details,
        "Session event"
    );
}

/// Log a failed durable write; the in-memory state stays authoritative
pub fn log_storage_failure(key: &str, error: &MeditripError) {
    warn!(
        key = key,
        error = %error,
        severity = %error.severity(),
        "Storage write failed, will retry on next mutation"
    );
}
