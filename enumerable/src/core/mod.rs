//! Core model types for enumerable pipelines.
//!
//! This module contains:
//! - Sequence sources, single-use and restartable
//! - The enumerable composition object
//! - Nested values and materialized trees

mod enumerable;
mod nested;
mod source;

pub use enumerable::{
    enumerate, enumerate_values, from_factory, from_factory_with_policy, Enumerable,
};
pub use nested::{Nested, Tree};
pub use source::{Element, Source, Traversal};

pub(crate) use source::replay_shared;
