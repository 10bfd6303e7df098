//! Streaming stages: one callback evaluation per pulled entry.

use super::{streaming, Step};
use crate::core::{Element, Source};
use crate::errors::StageFailure;
use crate::policy::ErrorPolicy;
use std::sync::Arc;

/// Maps each value, keeping its key.
pub fn map_by<K, V, U, F>(selector: F) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, U>
where
    K: Element,
    V: Element,
    U: Element,
    F: Fn(&V, &K) -> anyhow::Result<U> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("map_by", source, policy, move || {
            let selector = Arc::clone(&selector);
            move |(key, value): (K, V), index: usize| match selector(&value, &key) {
                Ok(mapped) => Ok(Step::Emit((key, mapped))),
                Err(err) => Err(StageFailure::new("map_by", index, &key, &value, err)),
            }
        })
    }
}

/// Replaces each key, keeping its value.
pub fn map_keys_by<K, V, K2, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K2, V>
where
    K: Element,
    V: Element,
    K2: Element,
    F: Fn(&V, &K) -> anyhow::Result<K2> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("map_keys_by", source, policy, move || {
            let selector = Arc::clone(&selector);
            move |(key, value): (K, V), index: usize| match selector(&value, &key) {
                Ok(new_key) => Ok(Step::Emit((new_key, value))),
                Err(err) => Err(StageFailure::new("map_keys_by", index, &key, &value, err)),
            }
        })
    }
}

/// Keeps entries for which the predicate holds.
pub fn filter_by<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, V>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("filter_by", source, policy, move || {
            let predicate = Arc::clone(&predicate);
            move |(key, value): (K, V), index: usize| match predicate(&value, &key) {
                Ok(true) => Ok(Step::Emit((key, value))),
                Ok(false) => Ok(Step::Skip),
                Err(err) => Err(StageFailure::new("filter_by", index, &key, &value, err)),
            }
        })
    }
}

/// Emits entries until the predicate first returns false, then ends the
/// sequence.
///
/// A failing predicate goes through the policy and does not end the
/// sequence.
pub fn take_while<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, V>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("take_while", source, policy, move || {
            let predicate = Arc::clone(&predicate);
            move |(key, value): (K, V), index: usize| match predicate(&value, &key) {
                Ok(true) => Ok(Step::Emit((key, value))),
                Ok(false) => Ok(Step::Halt),
                Err(err) => Err(StageFailure::new("take_while", index, &key, &value, err)),
            }
        })
    }
}

/// Drops entries while the predicate holds, then emits everything after.
///
/// Once the predicate returns false it is not evaluated again.
pub fn drop_while<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, V>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("drop_while", source, policy, move || {
            let predicate = Arc::clone(&predicate);
            let mut dropping = true;
            move |(key, value): (K, V), index: usize| {
                if !dropping {
                    return Ok(Step::Emit((key, value)));
                }
                match predicate(&value, &key) {
                    Ok(true) => Ok(Step::Skip),
                    Ok(false) => {
                        dropping = false;
                        Ok(Step::Emit((key, value)))
                    }
                    Err(err) => Err(StageFailure::new("drop_while", index, &key, &value, err)),
                }
            }
        })
    }
}

/// Runs a side effect for each entry and passes it through unchanged.
///
/// Entries whose callback fails are skipped if the policy absorbs the
/// failure.
pub fn for_each_with<K, V, F>(
    callback: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, V>
where
    K: Element,
    V: Element,
    F: Fn(&V, &K) -> anyhow::Result<()> + Send + Sync + 'static,
{
    let callback = Arc::new(callback);
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        streaming("for_each_with", source, policy, move || {
            let callback = Arc::clone(&callback);
            move |(key, value): (K, V), index: usize| match callback(&value, &key) {
                Ok(()) => Ok(Step::Emit((key, value))),
                Err(err) => Err(StageFailure::new("for_each_with", index, &key, &value, err)),
            }
        })
    }
}

/// Passes the source through untouched.
pub fn identity<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K, V> {
    |source: Source<K, V>, _policy: &ErrorPolicy| source
}
