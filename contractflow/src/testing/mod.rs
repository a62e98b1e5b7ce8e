//! Testing utilities for contractflow.
//!
//! This module provides:
//! - Record fixtures for the built-in contract types
//! - Assertions on validation results
//! - In-memory collaborators for the ports

mod assertions;
mod collaborators;
mod fixtures;

pub use assertions::{
    assert_finding_counts, assert_has_error, assert_has_warning, assert_invalid, assert_valid,
};
pub use collaborators::{InMemoryContractStore, RecordingDispatcher};
pub use fixtures::RecordBuilder;
