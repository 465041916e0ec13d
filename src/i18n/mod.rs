//! Internationalization module
//!
//! This module provides the translation collaborator used for view labels:
//! dictionary loading with default-language fallback and locale detection.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, IdentityTranslator, Translator};
