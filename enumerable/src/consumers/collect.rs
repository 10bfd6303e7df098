//! Materializing consumers.

use crate::core::{Element, Nested, Source, Tree};
use crate::errors::Result;
use crate::policy::ErrorPolicy;
use std::fmt::Display;

/// Materializes all entries in order, keys preserved.
pub fn to_entries<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<Vec<(K, V)>>
where
    K: Element,
    V: Element,
{
    |source: Source<K, V>, _policy: &ErrorPolicy| source.traverse().collect::<Result<Vec<_>>>()
}

fn materialize<K, V>(
    source: &Source<K, Nested<K, V>>,
    depth: Option<usize>,
) -> Result<Vec<(K, Tree<K, V>)>>
where
    K: Element,
    V: Element,
{
    source
        .traverse()
        .map(|item| -> Result<(K, Tree<K, V>)> {
            let (key, value) = item?;
            let tree = match value {
                Nested::Leaf(leaf) => Tree::Leaf(leaf),
                Nested::Sequence(nested) if depth == Some(0) => Tree::Unexpanded(nested),
                Nested::Sequence(nested) => {
                    Tree::Branch(materialize(&nested, depth.map(|d| d - 1))?)
                }
            };
            Ok((key, tree))
        })
        .collect()
}

/// Materializes entries into a nested container.
///
/// Nested sequences are expanded up to `depth` levels below the top, or
/// without limit when `depth` is `None`; deeper sequences are kept as
/// [`Tree::Unexpanded`].
pub fn to_container<K, V>(
    depth: Option<usize>,
) -> impl FnOnce(Source<K, Nested<K, V>>, &ErrorPolicy) -> Result<Vec<(K, Tree<K, V>)>>
where
    K: Element,
    V: Element,
{
    move |source: Source<K, Nested<K, V>>, _policy: &ErrorPolicy| materialize(&source, depth)
}

/// Joins the string forms of all values with `delimiter`.
pub fn join<K, V>(
    delimiter: impl Into<String>,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<String>
where
    K: Element,
    V: Element + Display,
{
    let delimiter = delimiter.into();
    move |source: Source<K, V>, _policy: &ErrorPolicy| -> Result<String> {
        let parts = source
            .traverse()
            .map(|item| item.map(|(_, value)| value.to_string()))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(&delimiter))
    }
}

/// Walks the source to the end, discarding entries.
///
/// Forces upstream side effects and surfaces propagated failures.
pub fn drain<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<()>
where
    K: Element,
    V: Element,
{
    |source: Source<K, V>, _policy: &ErrorPolicy| -> Result<()> {
        for item in source.traverse() {
            item?;
        }
        Ok(())
    }
}

/// Counts the entries reaching the consumer.
pub fn count<K, V>() -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Result<usize>
where
    K: Element,
    V: Element,
{
    |source: Source<K, V>, _policy: &ErrorPolicy| -> Result<usize> {
        let mut total = 0_usize;
        for item in source.traverse() {
            item?;
            total += 1;
        }
        Ok(total)
    }
}
