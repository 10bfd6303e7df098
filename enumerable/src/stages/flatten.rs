//! Flattening of nested sequences.

use super::{streaming, Step};
use crate::core::{Element, Nested, Source, Traversal};
use crate::errors::{EnumerableError, StageFailure};
use crate::policy::ErrorPolicy;
use std::sync::Arc;

type Values<K, V> = Box<dyn Iterator<Item = Result<Nested<K, V>, EnumerableError>> + Send>;

/// Pre-order walk yielding the leaves of nested sequences.
struct Leaves<K, V> {
    stack: Vec<Values<K, V>>,
}

impl<K: Element, V: Element> Leaves<K, V> {
    fn new<K0: Element>(input: Traversal<K0, Nested<K, V>>) -> Self {
        Self {
            stack: vec![Box::new(input.map(|item| item.map(|(_, value)| value)))],
        }
    }
}

impl<K: Element, V: Element> Iterator for Leaves<K, V> {
    type Item = Result<V, EnumerableError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Ok(Nested::Leaf(value))) => return Some(Ok(value)),
                Some(Ok(Nested::Sequence(nested))) => {
                    self.stack
                        .push(Box::new(nested.traverse().map(|item| item.map(|(_, value)| value))));
                }
                Some(Err(err)) => {
                    self.stack.clear();
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Expands nested sequences to their leaves and maps each leaf.
///
/// Nesting depth is unbounded and leaves come out in pre-order. Keys of the
/// input and of every nested sequence are discarded; the selector receives
/// each leaf with its leaf position, and output entries are keyed by their
/// output position.
pub fn flat_map_by<K, K2, V, U, F>(
    selector: F,
) -> impl FnOnce(Source<K, Nested<K2, V>>, &ErrorPolicy) -> Source<usize, U>
where
    K: Element,
    K2: Element,
    V: Element,
    U: Element,
    F: Fn(&V, &usize) -> anyhow::Result<U> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    move |source: Source<K, Nested<K2, V>>, policy: &ErrorPolicy| {
        let leaves: Source<usize, V> = source.derive(|input| {
            Box::new(
                Leaves::new(input)
                    .enumerate()
                    .map(|(position, leaf)| leaf.map(|value| (position, value))),
            )
        });
        streaming("flat_map_by", leaves, policy, move || {
            let selector = Arc::clone(&selector);
            let mut emitted = 0_usize;
            move |(position, value): (usize, V), index: usize| match selector(&value, &position) {
                Ok(mapped) => {
                    emitted += 1;
                    Ok(Step::Emit((emitted - 1, mapped)))
                }
                Err(err) => Err(StageFailure::new("flat_map_by", index, &position, &value, err)),
            }
        })
    }
}

/// Expands nested sequences to their leaves, keyed by position.
pub fn flatten<K, K2, V>(
) -> impl FnOnce(Source<K, Nested<K2, V>>, &ErrorPolicy) -> Source<usize, V>
where
    K: Element,
    K2: Element,
    V: Element + Clone,
{
    flat_map_by(|value: &V, _: &usize| Ok(value.clone()))
}
