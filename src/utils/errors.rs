//! Error handling for MediTrip
//!
//! This module defines the error types used by the navigation core and
//! classifies them so callers can decide whether to absorb or surface them.

use thiserror::Error;

/// Main error type for the MediTrip navigation core
#[derive(Error, Debug)]
pub enum MeditripError {
    #[error("{kind} not found for slug '{slug}'")]
    EntityNotFound { kind: EntityKind, slug: String },

    #[error("History write rejected: {0}")]
    HistoryWriteRejected(String),

    #[error("Persisted session store is corrupt: {0}")]
    PersistedStoreCorrupt(String),

    #[error("Page {page} requires {field} in the view context")]
    MissingViewContext { page: String, field: &'static str },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Catalog entity families addressable by slug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Hospital,
    Doctor,
    Package,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Hospital => write!(f, "Hospital"),
            EntityKind::Doctor => write!(f, "Doctor"),
            EntityKind::Package => write!(f, "Package"),
        }
    }
}

/// Result type alias for MediTrip operations
pub type Result<T> = std::result::Result<T, MeditripError>;

impl MeditripError {
    /// Check if the error is absorbed with a safe fallback instead of aborting
    pub fn is_recoverable(&self) -> bool {
        match self {
            MeditripError::EntityNotFound { .. } => true,
            MeditripError::HistoryWriteRejected(_) => true,
            MeditripError::PersistedStoreCorrupt(_) => true,
            MeditripError::MissingViewContext { .. } => true,
            MeditripError::SessionNotFound(_) => true,
            MeditripError::StorageWrite(_) => true,
            MeditripError::Config(_) => false,
            MeditripError::Settings(_) => false,
            MeditripError::InvalidInput(_) => true,
            MeditripError::Serialization(_) => false,
            MeditripError::Io(_) => true,
            MeditripError::UrlParse(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MeditripError::Config(_) | MeditripError::Settings(_) => ErrorSeverity::Critical,
            MeditripError::HistoryWriteRejected(_)
            | MeditripError::PersistedStoreCorrupt(_)
            | MeditripError::StorageWrite(_) => ErrorSeverity::Warning,
            MeditripError::EntityNotFound { .. }
            | MeditripError::MissingViewContext { .. }
            | MeditripError::SessionNotFound(_)
            | MeditripError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
