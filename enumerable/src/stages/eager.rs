//! Eager stages: grouping and windowing.

use crate::core::{replay_shared, Element, Source, Traversal};
use crate::errors::{EnumerableError, Result, StageFailure};
use crate::policy::ErrorPolicy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

type Groups<G, K, V> = Vec<(G, Vec<(K, V)>)>;

fn collect_groups<K, V, G, F>(
    input: Traversal<K, V>,
    policy: &ErrorPolicy,
    selector: &F,
) -> Result<Groups<G, K, V>>
where
    G: Eq + Hash + Clone,
    K: Element,
    V: Element,
    F: Fn(&V, &K) -> anyhow::Result<G>,
{
    let mut positions: HashMap<G, usize> = HashMap::new();
    let mut groups: Groups<G, K, V> = Vec::new();
    let mut entries = 0_usize;

    for (index, item) in input.enumerate() {
        let (key, value) = item?;
        entries += 1;
        match selector(&value, &key) {
            Ok(group) => {
                let slot = if let Some(&slot) = positions.get(&group) {
                    slot
                } else {
                    positions.insert(group.clone(), groups.len());
                    groups.push((group, Vec::new()));
                    groups.len() - 1
                };
                groups[slot].1.push((key, value));
            }
            Err(err) => policy.handle(StageFailure::new("group_by", index, &key, &value, err))?,
        }
    }

    debug!(groups = groups.len(), entries, "group_by drained input");
    Ok(groups)
}

enum Memo<G, K, V> {
    Pending,
    Ready(Arc<Groups<G, K, V>>),
    Failed(String),
}

/// Groups entries by a selector.
///
/// Emits `(group, entries)` pairs in order of each group's first
/// appearance; entries keep their original keys and order inside a group.
/// The whole input is drained when the output is first traversed, and the
/// result is restartable: later traversals replay the computed groups.
///
/// If draining fails over a restartable input, the next traversal drains
/// again. Over a single-use input the failure is final and every later
/// traversal yields [`EnumerableError::Consumed`].
pub fn group_by<K, V, G, F>(
    selector: F,
) -> impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<G, Vec<(K, V)>>
where
    K: Element + Clone,
    V: Element + Clone,
    G: Element + Eq + Hash + Clone,
    F: Fn(&V, &K) -> anyhow::Result<G> + Send + Sync + 'static,
{
    move |source: Source<K, V>, policy: &ErrorPolicy| {
        let policy = policy.clone();
        let memo: Mutex<Memo<G, K, V>> = Mutex::new(Memo::Pending);
        Source::replay(move || {
            let mut memo = memo.lock();
            let groups = match &*memo {
                Memo::Ready(groups) => Arc::clone(groups),
                Memo::Failed(reason) => {
                    return Box::new(std::iter::once(Err(EnumerableError::Consumed(format!(
                        "group_by input failed on an earlier traversal: {reason}"
                    )))));
                }
                Memo::Pending => match collect_groups(source.traverse(), &policy, &selector) {
                    Ok(groups) => {
                        let groups = Arc::new(groups);
                        *memo = Memo::Ready(Arc::clone(&groups));
                        groups
                    }
                    Err(err) => {
                        if !source.is_restartable() {
                            *memo = Memo::Failed(err.to_string());
                        }
                        return Box::new(std::iter::once(Err(err)));
                    }
                },
            };
            drop(memo);
            replay_shared(groups)
        })
    }
}

/// Iterator over fixed-size windows of a traversal.
struct Windows<K, V> {
    input: Traversal<K, V>,
    size: usize,
    index: usize,
    done: bool,
}

impl<K, V> Iterator for Windows<K, V> {
    type Item = Result<(usize, Vec<(K, V)>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut window = Vec::new();
        while window.len() < self.size {
            match self.input.next() {
                Some(Ok(entry)) => window.push(entry),
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if window.is_empty() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(Ok((index, window)))
    }
}

/// Partitions entries into windows of `size` entries.
///
/// Windows are keyed by their sequential index and keep the original keys.
/// The last window holds whatever remains and may be shorter.
///
/// # Errors
///
/// Returns [`EnumerableError::InvalidArgument`] if `size` is zero.
pub fn window_by<K, V>(
    size: usize,
) -> Result<impl FnOnce(Source<K, V>, &ErrorPolicy) -> Source<usize, Vec<(K, V)>>>
where
    K: Element,
    V: Element,
{
    if size == 0 {
        return Err(EnumerableError::invalid_argument(
            "window size must be a positive integer",
        ));
    }

    Ok(move |source: Source<K, V>, _policy: &ErrorPolicy| {
        source.derive(move |input| {
            Box::new(Windows {
                input,
                size,
                index: 0,
                done: false,
            })
        })
    })
}
