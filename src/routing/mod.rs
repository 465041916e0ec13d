//! Routing module
//!
//! Slug codec, catalog lookups by slug, path parsing/formatting and the
//! history adapter that mirrors view state into the address bar.

pub mod slug;
pub mod resolver;
pub mod path;
pub mod history;

pub use history::{BackOutcome, HistoryAdapter, HistoryBackend, MemoryHistory};
pub use resolver::{resolve_doctor_by_slug, resolve_hospital_by_slug, resolve_package_by_slug};
