//! Predicate consumers: `all`, `any`, `first`, `last`.

use super::evaluate;
use crate::core::{Element, Source};
use crate::errors::Result;
use crate::policy::ErrorPolicy;

/// Returns true if the predicate holds for every entry.
///
/// Stops at the first entry for which it returns false. Entries whose
/// predicate fails count as neither true nor false when absorbed.
pub fn all<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<bool>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<bool> {
        for (index, item) in source.traverse().enumerate() {
            let (key, value) = item?;
            let outcome = predicate(&value, &key);
            if evaluate("all", policy, index, &key, &value, outcome)? == Some(false) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Returns true if the predicate holds for any entry.
pub fn any<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<bool>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<bool> {
        for (index, item) in source.traverse().enumerate() {
            let (key, value) = item?;
            let outcome = predicate(&value, &key);
            if evaluate("any", policy, index, &key, &value, outcome)? == Some(true) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn find_first<K, V, P>(
    consumer: &'static str,
    source: &Source<K, V>,
    policy: &ErrorPolicy,
    predicate: &P,
) -> Result<Option<(K, V)>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    for (index, item) in source.traverse().enumerate() {
        let (key, value) = item?;
        let outcome = predicate(&value, &key);
        if evaluate(consumer, policy, index, &key, &value, outcome)? == Some(true) {
            return Ok(Some((key, value)));
        }
    }
    Ok(None)
}

fn find_last<K, V, P>(
    consumer: &'static str,
    source: &Source<K, V>,
    policy: &ErrorPolicy,
    predicate: &P,
) -> Result<Option<(K, V)>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    let mut found = None;
    for (index, item) in source.traverse().enumerate() {
        let (key, value) = item?;
        let outcome = predicate(&value, &key);
        if evaluate(consumer, policy, index, &key, &value, outcome)? == Some(true) {
            found = Some((key, value));
        }
    }
    Ok(found)
}

/// Returns the value of the first entry matching the predicate.
pub fn first<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<V>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<V>> {
        Ok(find_first("first", &source, policy, &predicate)?.map(|(_, value)| value))
    }
}

/// Returns the key of the first entry matching the predicate.
pub fn first_key<K, V, P>(
    predicate: P,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<K>> {
        Ok(find_first("first_key", &source, policy, &predicate)?.map(|(key, _)| key))
    }
}

/// Returns the value of the last entry matching the predicate.
///
/// Always traverses to the end.
pub fn last<K, V, P>(predicate: P) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<V>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<V>> {
        Ok(find_last("last", &source, policy, &predicate)?.map(|(_, value)| value))
    }
}

/// Returns the key of the last entry matching the predicate.
pub fn last_key<K, V, P>(
    predicate: P,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element,
    P: Fn(&V, &K) -> anyhow::Result<bool>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<K>> {
        Ok(find_last("last_key", &source, policy, &predicate)?.map(|(key, _)| key))
    }
}
