//! Testing utilities for enumerable pipelines.
//!
//! This module provides:
//! - Ready-made sources (restartable and single-use)
//! - Callback helpers that fail on chosen values or record what they see
//! - Assertions over traversed entries and stage failures

mod assertions;
mod fixtures;

pub use assertions::{assert_entries, assert_stage_failure, assert_values};
pub use fixtures::{fail_on, init_tracing, numbers, single_use, Recorder};
