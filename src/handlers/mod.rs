//! Command front end
//!
//! Text commands drive the controller the way the presentation layer would:
//! navigation intents, host history events, chat and filter actions.

pub mod commands;

// Re-export commonly used handler functions
pub use commands::{execute, Command, Outcome};
