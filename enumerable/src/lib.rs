//! # Enumerable
//!
//! Lazy, composable pipelines over sequences of `(key, value)` entries.
//!
//! An [`Enumerable`](core::Enumerable) pairs a source of entries with an
//! error policy. Stages are appended with `then` and a terminal consumer is
//! run with `into`:
//!
//! - **Lazy evaluation**: nothing is pulled from the source until a consumer
//!   or a traversal asks for entries
//! - **Keys preserved**: stages carry each entry's key unless they say
//!   otherwise, duplicates included
//! - **Restartable sources**: factory-backed sources replay on every
//!   traversal, single-use sources are consumed once
//! - **Error policies**: one policy per pipeline decides whether a failing
//!   callback skips its entry or aborts the traversal
//!
//! ## Quick Start
//!
//! ```rust
//! use enumerable::prelude::*;
//!
//! let evens = enumerate_values(vec![1, 2, 3, 4, 5, 6])
//!     .then(filter_by(|v: &i32, _: &usize| Ok(v % 2 == 0)))
//!     .then(map_by(|v: &i32, _: &usize| Ok(v * 10)))
//!     .into(to_entries())?;
//!
//! assert_eq!(evens, vec![(1, 20), (3, 40), (5, 60)]);
//! # Ok::<(), enumerable::errors::EnumerableError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod consumers;
pub mod core;
pub mod errors;
pub mod policy;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::consumers::{
        all, any, count, drain, first, first_key, join, last, last_key, max, max_by, max_key,
        max_key_by, min, min_by, min_key, min_key_by, to_container, to_entries,
    };
    pub use crate::core::{
        enumerate, enumerate_values, from_factory, from_factory_with_policy, Element,
        Enumerable, Nested, Source, Traversal, Tree,
    };
    pub use crate::errors::{EnumerableError, Result, StageFailure};
    pub use crate::policy::{ErrorPolicy, FailureLog, FailureMode, FailureRecord, PolicyConfig};
    pub use crate::stages::{
        drop_while, filter_by, flat_map_by, flatten, for_each_with, group_by, identity, map_by,
        map_keys_by, take_while, window_by,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_composes_pipeline() {
        let total = from_factory(|| vec![("a", 1), ("b", 2), ("c", 3)])
            .then(filter_by(|v: &i32, _: &&str| Ok(*v > 1)))
            .into(count())
            .unwrap();
        assert_eq!(total, 2);
    }
}
