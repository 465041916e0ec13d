//! State management module
//!
//! This module holds the view state machine, the chat session store, the
//! live marketplace filter and the durable storage they persist through.

pub mod context;
pub mod machine;
pub mod sessions;
pub mod filters;
pub mod storage;

// Re-export commonly used state components
pub use context::{ContextField, ContextSummary, Page, ViewContext};
pub use machine::{NavigationIntent, Transition, ViewStateMachine};
pub use sessions::{SessionPolicy, SessionStore};
pub use filters::FilterSynchronizer;
pub use storage::{FileStore, KeyValueStore, MemoryStore, SessionPersistence};
