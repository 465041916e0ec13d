//! Test helpers module
//!
//! This module provides catalog fixtures and a controller harness with
//! observable history and storage handles.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
