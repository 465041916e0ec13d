//! Services module
//!
//! Collaborators the navigation core consumes but does not own.

pub mod catalog;

pub use catalog::{Catalog, InMemoryCatalog};
