//! Minimum and maximum consumers.

use super::evaluate;
use crate::core::{Element, Source};
use crate::errors::Result;
use crate::policy::ErrorPolicy;

/// Single pass tracking the best selected value and its key.
///
/// `replaces(candidate, best)` must be strict so ties keep the earliest
/// entry.
fn best_by<K, V, U, F>(
    consumer: &'static str,
    source: &Source<K, V>,
    policy: &ErrorPolicy,
    selector: &F,
    replaces: fn(&U, &U) -> bool,
) -> Result<Option<(K, U)>>
where
    K: Element,
    V: Element,
    F: Fn(&V, &K) -> anyhow::Result<U>,
{
    let mut best: Option<(K, U)> = None;
    for (index, item) in source.traverse().enumerate() {
        let (key, value) = item?;
        let outcome = selector(&value, &key);
        let Some(candidate) = evaluate(consumer, policy, index, &key, &value, outcome)? else {
            continue;
        };
        let better = match &best {
            Some((_, current)) => replaces(&candidate, current),
            None => true,
        };
        if better {
            best = Some((key, candidate));
        }
    }
    Ok(best)
}

fn less<U: PartialOrd>(candidate: &U, best: &U) -> bool {
    candidate < best
}

fn greater<U: PartialOrd>(candidate: &U, best: &U) -> bool {
    candidate > best
}

/// Returns the smallest selected value, or `None` if nothing was selected.
pub fn min_by<K, V, U, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<U>>
where
    K: Element,
    V: Element,
    U: PartialOrd,
    F: Fn(&V, &K) -> anyhow::Result<U>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<U>> {
        Ok(best_by("min_by", &source, policy, &selector, less)?.map(|(_, selected)| selected))
    }
}

/// Returns the largest selected value, or `None` if nothing was selected.
pub fn max_by<K, V, U, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<U>>
where
    K: Element,
    V: Element,
    U: PartialOrd,
    F: Fn(&V, &K) -> anyhow::Result<U>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<U>> {
        Ok(best_by("max_by", &source, policy, &selector, greater)?.map(|(_, selected)| selected))
    }
}

/// Returns the key of the first entry with the smallest selected value.
pub fn min_key_by<K, V, U, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element,
    U: PartialOrd,
    F: Fn(&V, &K) -> anyhow::Result<U>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<K>> {
        Ok(best_by("min_key_by", &source, policy, &selector, less)?.map(|(key, _)| key))
    }
}

/// Returns the key of the first entry with the largest selected value.
pub fn max_key_by<K, V, U, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element,
    U: PartialOrd,
    F: Fn(&V, &K) -> anyhow::Result<U>,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| -> Result<Option<K>> {
        Ok(best_by("max_key_by", &source, policy, &selector, greater)?.map(|(key, _)| key))
    }
}

/// Returns the smallest value.
pub fn min<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<V>>
where
    K: Element,
    V: Element + PartialOrd + Clone,
{
    min_by(|value: &V, _: &K| Ok(value.clone()))
}

/// Returns the largest value.
pub fn max<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<V>>
where
    K: Element,
    V: Element + PartialOrd + Clone,
{
    max_by(|value: &V, _: &K| Ok(value.clone()))
}

/// Returns the key of the first smallest value.
pub fn min_key<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element + PartialOrd + Clone,
{
    min_key_by(|value: &V, _: &K| Ok(value.clone()))
}

/// Returns the key of the first largest value.
pub fn max_key<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Option<K>>
where
    K: Element,
    V: Element + PartialOrd + Clone,
{
    max_key_by(|value: &V, _: &K| Ok(value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{enumerate_values, Enumerable};
    use anyhow::bail;

    fn sample() -> Enumerable<usize, i32> {
        Enumerable::new(vec![(0, 4), (1, 5), (2, 6), (3, 1), (4, 2), (5, 3)])
    }

    #[test]
    fn test_extremes_of_sample() {
        assert_eq!(sample().into(min()).unwrap(), Some(1));
        assert_eq!(sample().into(max()).unwrap(), Some(6));
        assert_eq!(sample().into(min_key()).unwrap(), Some(3));
        assert_eq!(sample().into(max_key()).unwrap(), Some(2));
    }

    #[test]
    fn test_empty_yields_none() {
        assert_eq!(enumerate_values(Vec::<i32>::new()).into(min()).unwrap(), None);
        assert_eq!(enumerate_values(Vec::<i32>::new()).into(max()).unwrap(), None);
        assert_eq!(enumerate_values(Vec::<i32>::new()).into(min_key()).unwrap(), None);
        assert_eq!(enumerate_values(Vec::<i32>::new()).into(max_key()).unwrap(), None);
    }

    #[test]
    fn test_ties_keep_earliest() {
        let ties = Enumerable::new(vec![("a", 2), ("b", 1), ("c", 1), ("d", 2)]);

        assert_eq!(ties.clone().into(min_key()).unwrap(), Some("b"));
        assert_eq!(ties.into(max_key()).unwrap(), Some("a"));
    }

    #[test]
    fn test_selector_and_failures() {
        let skipping = Enumerable::with_policy(
            vec![(0_usize, "aa"), (1, "bbbb"), (2, "c")],
            crate::policy::ErrorPolicy::skip(),
        );
        let longest = skipping
            .clone()
            .into(max_by(|v: &&str, _: &usize| Ok(v.len())))
            .unwrap();
        assert_eq!(longest, Some(4));

        let all_failed = skipping
            .into(min_by(|_: &&str, _: &usize| -> anyhow::Result<usize> { bail!("no") }))
            .unwrap();
        assert_eq!(all_failed, None);
    }
}
