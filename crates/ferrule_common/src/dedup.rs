//! Order-preserving deduplication.

use std::hash::Hash;

use indexmap::IndexSet;

/// Removes duplicates while keeping the first occurrence of each item.
pub fn dedup<I, T>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Hash + Eq,
{
    items.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}
