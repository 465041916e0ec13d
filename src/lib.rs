//! MediTrip navigator
//!
//! View-state router and session/filter persistence core for a medical
//! tourism marketplace. The crate keeps the active page, the address bar,
//! browser history and the persisted chat sessions consistent with each
//! other; presentation is left to the host.

pub mod config;
pub mod controller;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod routing;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MeditripError, Result};

// Re-export main components for easy access
pub use controller::{AppController, Breadcrumb, ViewSnapshot};
pub use i18n::{I18n, Translator};
pub use services::{Catalog, InMemoryCatalog};
pub use state::{NavigationIntent, Page, Transition};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
