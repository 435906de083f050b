//! Heap-allocated payloads owned by a [`Value`](crate::Value).
//!
//! Each payload carries a [`Version`](crate::guard::Version) that its
//! structural mutators (insert, remove, clear, bulk extend/update) bump by
//! exactly one per successful call. Element replacement through `get_mut`
//! is not structural and leaves the version alone. The version never takes
//! part in equality or hashing.

mod graph;
mod list;
mod map;
mod ordered;
mod set;
mod text;

pub use graph::{Edge, Graph, Node};
pub use list::List;
pub use map::Dict;
pub use ordered::{OrderedDict, OrderedSet};
pub use set::Set;
pub use text::Text;

use crate::error::{Result, VarError};

/// Resolve a possibly negative position against a length; negative positions
/// count from the end.
pub(crate) fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index
    };
    if resolved < 0 || resolved as u64 >= len as u64 {
        return Err(VarError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Like [`resolve_index`] but allows `len` itself, for insertion points.
/// Out-of-range positions clamp to the nearest end.
pub(crate) fn resolve_insert_index(index: i64, len: usize) -> usize {
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index
    };
    resolved.clamp(0, len as i64) as usize
}

/// Order-independent hash of a collection: the wrapping sum of per-element
/// hashes. Uses a fixed-key hasher so equal collections hash alike on every
/// thread.
pub(crate) fn unordered_hash<T, I>(items: I) -> u64
where
    T: std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    use std::hash::{DefaultHasher, Hasher};
    items.into_iter().fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}
