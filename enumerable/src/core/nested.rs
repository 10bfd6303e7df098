//! Values that may themselves be sequences.

use super::source::{Element, Source};

/// A value that is either a leaf or a nested sequence of entries.
///
/// Flat-mapping and container materialization branch on this tag rather than
/// inspecting values at runtime.
#[derive(Debug, Clone)]
pub enum Nested<K, V> {
    /// A plain value.
    Leaf(V),
    /// A nested sequence whose values may nest further.
    Sequence(Source<K, Nested<K, V>>),
}

impl<K: Element, V: Element> Nested<K, V> {
    /// Creates a restartable nested sequence from entries.
    pub fn sequence<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Clone,
        V: Clone,
    {
        Self::Sequence(Source::from_entries(entries.into_iter().collect()))
    }

    /// Creates a nested sequence of leaves keyed by position.
    pub fn leaves<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        K: From<usize> + Clone,
        V: Clone,
    {
        Self::sequence(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (K::from(i), Self::Leaf(v))),
        )
    }
}

impl<K, V> Nested<K, V> {
    /// Returns true if this is a nested sequence.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns the leaf value, if this is a leaf.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&V> {
        match self {
            Self::Leaf(v) => Some(v),
            Self::Sequence(_) => None,
        }
    }
}

impl<K, V> From<V> for Nested<K, V> {
    fn from(value: V) -> Self {
        Self::Leaf(value)
    }
}

/// A materialized nested container.
#[derive(Debug, Clone)]
pub enum Tree<K, V> {
    /// A plain value.
    Leaf(V),
    /// An expanded nested sequence, keys preserved in order.
    Branch(Vec<(K, Tree<K, V>)>),
    /// A nested sequence beyond the expansion depth, left as is.
    Unexpanded(Source<K, Nested<K, V>>),
}

impl<K, V> Tree<K, V> {
    /// Returns the leaf value, if this is a leaf.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&V> {
        match self {
            Self::Leaf(v) => Some(v),
            Self::Branch(_) | Self::Unexpanded(_) => None,
        }
    }

    /// Returns the expanded entries, if this is a branch.
    #[must_use]
    pub fn as_branch(&self) -> Option<&[(K, Self)]> {
        match self {
            Self::Branch(entries) => Some(entries),
            Self::Leaf(_) | Self::Unexpanded(_) => None,
        }
    }
}

// Unexpanded sequences compare by identity.
impl<K: PartialEq, V: PartialEq> PartialEq for Tree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (Self::Branch(a), Self::Branch(b)) => a == b,
            (Self::Unexpanded(a), Self::Unexpanded(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
