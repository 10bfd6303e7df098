//! Sequence sources: single-use and restartable producers of entries.

use crate::errors::EnumerableError;
use parking_lot::Mutex;
use std::fmt::{self, Debug};
use std::sync::Arc;
use tracing::debug;

/// Bound satisfied by every key and value flowing through a pipeline.
///
/// `Debug` lets failures carry a rendering of the offending entry.
pub trait Element: Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Debug + Send + Sync + 'static {}

/// One in-flight traversal of a source.
///
/// An `Err` item terminates the traversal.
pub type Traversal<K, V> = Box<dyn Iterator<Item = Result<(K, V), EnumerableError>> + Send>;

type Deferred<K, V> = Box<dyn FnOnce() -> Traversal<K, V> + Send>;
type Factory<K, V> = Arc<dyn Fn() -> Traversal<K, V> + Send + Sync>;

enum Kind<K, V> {
    Once(Mutex<Option<Deferred<K, V>>>),
    Replay(Factory<K, V>),
}

/// A lazy producer of `(key, value)` entries.
///
/// Cloning a source clones the handle, not the entries: clones of a
/// single-use source share its one cursor, clones of a restartable source
/// each get fresh traversals.
pub struct Source<K, V> {
    kind: Arc<Kind<K, V>>,
}

impl<K, V> Clone for Source<K, V> {
    fn clone(&self) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
        }
    }
}

impl<K, V> Debug for Source<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("restartable", &self.is_restartable())
            .finish()
    }
}

impl<K: Element, V: Element> Source<K, V> {
    /// Creates a single-use source over an iterator.
    ///
    /// The first traversal consumes the iterator; later traversals are empty.
    pub fn once<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: Send + 'static,
    {
        let iter = entries.into_iter();
        Self::deferred(move || Box::new(iter.map(Ok::<_, EnumerableError>)))
    }

    /// Creates a single-use source over a fallible iterator.
    pub fn try_once<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Result<(K, V), EnumerableError>>,
        I::IntoIter: Send + 'static,
    {
        let iter = entries.into_iter();
        Self::deferred(move || Box::new(Fused::new(iter)))
    }

    /// Creates a restartable source whose factory is invoked per traversal.
    pub fn from_factory<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: Send + 'static,
    {
        Self::replay(move || Box::new(factory().into_iter().map(Ok::<_, EnumerableError>)))
    }

    /// Creates a restartable source over materialized entries.
    pub fn from_entries(entries: Vec<(K, V)>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self::from_shared(Arc::new(entries))
    }

    pub(crate) fn from_shared(entries: Arc<Vec<(K, V)>>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self::replay(move || replay_shared(Arc::clone(&entries)))
    }

    /// Creates an empty restartable source.
    #[must_use]
    pub fn empty() -> Self {
        Self::replay(|| Box::new(std::iter::empty::<Result<(K, V), EnumerableError>>()))
    }

    pub(crate) fn deferred<F>(producer: F) -> Self
    where
        F: FnOnce() -> Traversal<K, V> + Send + 'static,
    {
        Self {
            kind: Arc::new(Kind::Once(Mutex::new(Some(Box::new(producer))))),
        }
    }

    pub(crate) fn replay<F>(factory: F) -> Self
    where
        F: Fn() -> Traversal<K, V> + Send + Sync + 'static,
    {
        Self {
            kind: Arc::new(Kind::Replay(Arc::new(factory))),
        }
    }

    /// Starts a traversal.
    ///
    /// Nothing upstream is pulled until the returned iterator is advanced.
    pub fn traverse(&self) -> Traversal<K, V> {
        match self.kind.as_ref() {
            Kind::Once(slot) => {
                let producer = slot.lock().take();
                if let Some(producer) = producer {
                    producer()
                } else {
                    debug!("single-use source already traversed, yielding nothing");
                    Box::new(std::iter::empty::<Result<(K, V), EnumerableError>>())
                }
            }
            Kind::Replay(factory) => factory(),
        }
    }

    /// Builds a source whose traversals adapt traversals of `self`.
    ///
    /// The result is restartable exactly when `self` is; `adapt` runs once
    /// per traversal so any state it creates is private to that traversal.
    pub fn derive<K2, V2, F>(self, adapt: F) -> Source<K2, V2>
    where
        K2: Element,
        V2: Element,
        F: Fn(Traversal<K, V>) -> Traversal<K2, V2> + Send + Sync + 'static,
    {
        if self.is_restartable() {
            Source::replay(move || adapt(self.traverse()))
        } else {
            Source::deferred(move || adapt(self.traverse()))
        }
    }
}

impl<K, V> Source<K, V> {
    /// Returns true if every traversal re-invokes a factory.
    #[must_use]
    pub fn is_restartable(&self) -> bool {
        matches!(self.kind.as_ref(), Kind::Replay(_))
    }

    /// Returns true if both handles refer to the same source.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind)
    }
}

impl<K, V> From<Vec<(K, V)>> for Source<K, V>
where
    K: Element + Clone,
    V: Element + Clone,
{
    fn from(entries: Vec<(K, V)>) -> Self {
        Self::from_entries(entries)
    }
}

/// Traverses shared materialized entries, cloning each one out.
pub(crate) fn replay_shared<K, V>(entries: Arc<Vec<(K, V)>>) -> Traversal<K, V>
where
    K: Element + Clone,
    V: Element + Clone,
{
    Box::new((0..entries.len()).map(move |i| Ok::<_, EnumerableError>(entries[i].clone())))
}

/// Stops an iterator after its first error.
pub(crate) struct Fused<I> {
    inner: I,
    done: bool,
}

impl<I> Fused<I> {
    pub(crate) const fn new(inner: I) -> Self {
        Self { inner, done: false }
    }
}

impl<I, T> Iterator for Fused<I>
where
    I: Iterator<Item = Result<T, EnumerableError>>,
{
    type Item = Result<T, EnumerableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.inner.next();
        match &item {
            None | Some(Err(_)) => self.done = true,
            Some(Ok(_)) => {}
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn collect<K: Element, V: Element>(source: &Source<K, V>) -> Vec<(K, V)> {
        source.traverse().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_once_source_yields_nothing_second_time() {
        let source = Source::once(vec![(0, 'a'), (1, 'b')]);

        assert!(!source.is_restartable());
        assert_eq!(collect(&source), vec![(0, 'a'), (1, 'b')]);
        assert!(collect(&source).is_empty());
    }

    #[test]
    fn test_factory_source_restarts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = Source::from_factory(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            (0..3).map(|i| (i, i * 10))
        });

        assert!(source.is_restartable());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(collect(&source), vec![(0, 0), (1, 10), (2, 20)]);
        assert_eq!(collect(&source), vec![(0, 0), (1, 10), (2, 20)]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_interleaved_once_traversals_do_not_interfere() {
        let source = Source::once(vec![(0, 1), (1, 2), (2, 3)]);
        let mut first = source.traverse();
        assert_eq!(first.next().unwrap().unwrap(), (0, 1));

        let mut second = source.traverse();
        assert!(second.next().is_none());
        assert_eq!(first.next().unwrap().unwrap(), (1, 2));
    }

    #[test]
    fn test_derive_preserves_restartability() {
        let replay: Source<i32, i32> = Source::from_entries(vec![(0, 1), (1, 2)])
            .derive(|t| Box::new(t.map(|r| r.map(|(k, v)| (k, v * 2)))));
        assert!(replay.is_restartable());
        assert_eq!(collect(&replay), vec![(0, 2), (1, 4)]);
        assert_eq!(collect(&replay), vec![(0, 2), (1, 4)]);

        let once = Source::once(vec![(0, 1)]).derive(|t| t);
        assert!(!once.is_restartable());
        assert_eq!(collect(&once), vec![(0, 1)]);
        assert!(collect(&once).is_empty());
    }

    #[test]
    fn test_try_once_stops_after_error() {
        let source: Source<usize, i32> = Source::try_once(vec![
            Ok((0, 1)),
            Err(EnumerableError::invalid_argument("bad row")),
            Ok((2, 3)),
        ]);
        let items: Vec<_> = source.traverse().collect();

        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }

    #[test]
    fn test_clone_shares_handle() {
        let source = Source::<usize, i32>::empty();
        assert!(source.ptr_eq(&source.clone()));
        assert!(!source.ptr_eq(&Source::empty()));
    }
}
