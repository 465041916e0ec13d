//! Data models module
//!
//! Catalog entities are read-only and shared; chat and filter types are the
//! records the session store persists.

pub mod hospital;
pub mod doctor;
pub mod package;
pub mod chat;
pub mod filter;

// Re-export commonly used models
pub use hospital::{Hospital, Specialization};
pub use doctor::Doctor;
pub use package::MedicalPackage;
pub use chat::{ChatSession, Message, MessageRole};
pub use filter::{FilterState, FilterUpdate, GeoPoint};
