//! The enumerable composition object.

use super::source::{Element, Source, Traversal};
use crate::errors::{EnumerableError, Result};
use crate::policy::ErrorPolicy;
use tracing::trace;

/// An immutable pairing of a source with the error policy shared by every
/// stage composed onto it.
///
/// `then` appends a stage and `into` runs a terminal consumer; the
/// enumerable can also be traversed directly. Nothing runs until a consumer
/// or a traversal pulls entries.
#[derive(Debug)]
pub struct Enumerable<K, V> {
    source: Source<K, V>,
    policy: ErrorPolicy,
}

impl<K, V> Clone for Enumerable<K, V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<K: Element, V: Element> Enumerable<K, V> {
    /// Wraps a source with the default rethrowing policy.
    pub fn new(source: impl Into<Source<K, V>>) -> Self {
        Self::with_policy(source, ErrorPolicy::default())
    }

    /// Wraps a source with the given policy.
    pub fn with_policy(source: impl Into<Source<K, V>>, policy: ErrorPolicy) -> Self {
        Self {
            source: source.into(),
            policy,
        }
    }

    /// Appends a stage, returning a new enumerable over its output.
    ///
    /// The stage receives this enumerable's source and policy; the policy
    /// carries over unchanged.
    pub fn then<K2, V2, S>(self, stage: S) -> Enumerable<K2, V2>
    where
        K2: Element,
        V2: Element,
        S: FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K2, V2>,
    {
        trace!(policy = self.policy.label(), "composing stage");
        let source = stage(self.source, &self.policy);
        Enumerable {
            source,
            policy: self.policy,
        }
    }

    /// Runs a terminal consumer over the composed source.
    pub fn into<R, C>(self, consumer: C) -> Result<R>
    where
        C: FnOnce(Source<K, V>, &ErrorPolicy) -> Result<R>,
    {
        trace!(
            policy = self.policy.label(),
            restartable = self.source.is_restartable(),
            "running consumer"
        );
        consumer(self.source, &self.policy)
    }

    /// Materializes all entries in order, keys preserved.
    pub fn collect_entries(self) -> Result<Vec<(K, V)>> {
        self.into(crate::consumers::to_entries())
    }

    /// Starts a traversal of the composed source.
    pub fn iter(&self) -> Traversal<K, V> {
        self.source.traverse()
    }
}

impl<K, V> Enumerable<K, V> {
    /// Returns the error policy.
    pub const fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    /// Returns the composed source.
    pub const fn source(&self) -> &Source<K, V> {
        &self.source
    }

    /// Returns true if the composed source can be traversed repeatedly.
    pub fn is_restartable(&self) -> bool {
        self.source.is_restartable()
    }
}

impl<K: Element, V: Element> IntoIterator for Enumerable<K, V> {
    type Item = std::result::Result<(K, V), EnumerableError>;
    type IntoIter = Traversal<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.source.traverse()
    }
}

impl<K: Element, V: Element> IntoIterator for &Enumerable<K, V> {
    type Item = std::result::Result<(K, V), EnumerableError>;
    type IntoIter = Traversal<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.source.traverse()
    }
}

/// Wraps any iterable of entries as a single-use enumerable.
pub fn enumerate<K, V, I>(entries: I) -> Enumerable<K, V>
where
    K: Element,
    V: Element,
    I: IntoIterator<Item = (K, V)>,
    I::IntoIter: Send + 'static,
{
    Enumerable::new(Source::once(entries))
}

/// Wraps any iterable of values as a single-use enumerable keyed by position.
pub fn enumerate_values<V, I>(values: I) -> Enumerable<usize, V>
where
    V: Element,
    I: IntoIterator<Item = V>,
    I::IntoIter: Send + 'static,
{
    enumerate(values.into_iter().enumerate())
}

/// Creates a restartable enumerable whose factory runs once per traversal.
pub fn from_factory<K, V, F, I>(factory: F) -> Enumerable<K, V>
where
    K: Element,
    V: Element,
    F: Fn() -> I + Send + Sync + 'static,
    I: IntoIterator<Item = (K, V)>,
    I::IntoIter: Send + 'static,
{
    from_factory_with_policy(factory, ErrorPolicy::default())
}

/// Creates a restartable enumerable with an explicit policy.
pub fn from_factory_with_policy<K, V, F, I>(factory: F, policy: ErrorPolicy) -> Enumerable<K, V>
where
    K: Element,
    V: Element,
    F: Fn() -> I + Send + Sync + 'static,
    I: IntoIterator<Item = (K, V)>,
    I::IntoIter: Send + 'static,
{
    Enumerable::with_policy(Source::from_factory(factory), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values<V: Element>(enumerable: &Enumerable<usize, V>) -> Vec<V> {
        enumerable.iter().map(|r| r.unwrap().1).collect()
    }

    #[test]
    fn test_enumerate_with_vec() {
        let enumerable = Enumerable::new(vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(values(&enumerable), vec![1, 2, 3]);
        assert_eq!(values(&enumerable), vec![1, 2, 3]);
    }

    #[test]
    fn test_enumerate_with_iterator() {
        let enumerable = enumerate_values(vec![1, 2, 3].into_iter());

        let mut result = Vec::new();
        for entry in &enumerable {
            result.push(entry.unwrap());
        }
        assert_eq!(result, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(enumerable.into_iter().count(), 0);
    }

    #[test]
    fn test_enumerate_empty() {
        let enumerable = enumerate_values(Vec::<i32>::new());
        assert!(values(&enumerable).is_empty());
    }

    #[test]
    fn test_from_factory_replays() {
        let enumerable = from_factory(|| (1..=3).enumerate());

        assert!(enumerable.is_restartable());
        for _ in 0..3 {
            assert_eq!(values(&enumerable), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_then_keeps_policy_identity() {
        let policy = ErrorPolicy::skip();
        let enumerable = Enumerable::with_policy(vec![(0_usize, 1)], policy.clone());
        let derived = enumerable.clone().then(|source, _| source);
        let twice = derived.clone().then(|source, _| source);

        assert!(enumerable.policy().ptr_eq(&policy));
        assert!(derived.policy().ptr_eq(&policy));
        assert!(twice.policy().ptr_eq(&policy));
    }

    #[test]
    fn test_then_is_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let enumerable = from_factory(move || {
            let counter = Arc::clone(&counter);
            (0..3_usize).map(move |i| {
                counter.fetch_add(1, Ordering::SeqCst);
                (i, i)
            })
        })
        .then(|source, _| source.derive(|t| t));

        assert_eq!(pulls.load(Ordering::SeqCst), 0);
        assert_eq!(enumerable.collect_entries().unwrap().len(), 3);
        assert_eq!(pulls.load(Ordering::SeqCst), 3);
    }
}
