//! Terminal consumers.
//!
//! A consumer has the shape `FnOnce(Source<K, V>, &ErrorPolicy) -> Result<R>`
//! and is run with [`Enumerable::into`](crate::core::Enumerable::into). It
//! pulls entries until it has its answer; callback failures go through the
//! policy exactly like in streaming stages.

mod collect;
mod extrema;
mod search;

pub use collect::{count, drain, join, to_container, to_entries};
pub use extrema::{max, max_by, max_key, max_key_by, min, min_by, min_key, min_key_by};
pub use search::{all, any, first, first_key, last, last_key};

use crate::errors::{Result, StageFailure};
use crate::policy::ErrorPolicy;
use std::fmt::Debug;

/// Resolves a callback outcome against the policy.
///
/// Returns `Ok(None)` when the policy absorbed the failure.
pub(crate) fn evaluate<K, V, T>(
    consumer: &'static str,
    policy: &ErrorPolicy,
    index: usize,
    key: &K,
    value: &V,
    outcome: anyhow::Result<T>,
) -> Result<Option<T>>
where
    K: Debug,
    V: Debug,
{
    match outcome {
        Ok(result) => Ok(Some(result)),
        Err(err) => {
            policy.handle(StageFailure::new(consumer, index, key, value, err))?;
            Ok(None)
        }
    }
}
