use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};
use crate::heap::unordered_hash;
use crate::value::Value;

/// Hash set of values. Comparison is by membership only; iteration order is
/// unspecified and removal may reorder the remaining elements.
#[derive(Debug, Clone, Default)]
pub struct Set {
    items: IndexSet<Value>,
    version: Version,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.items.iter()
    }

    /// Returns `true` if the value was not already present.
    pub fn insert(&mut self, value: Value) -> bool {
        let added = self.items.insert(value);
        self.version.bump();
        added
    }

    /// Remove `value`, failing with `KeyNotFound` when absent.
    pub fn remove(&mut self, value: &Value) -> Result<Value> {
        let removed = self
            .items
            .swap_take(value)
            .ok_or_else(|| VarError::KeyNotFound(value.repr()))?;
        self.version.bump();
        Ok(removed)
    }

    /// Remove `value` if present.
    pub fn discard(&mut self, value: &Value) -> bool {
        let removed = self.items.swap_remove(value);
        self.version.bump();
        removed
    }

    pub fn pop(&mut self) -> Result<Value> {
        let popped = self
            .items
            .pop()
            .ok_or_else(|| VarError::KeyNotFound("pop from an empty set".to_string()))?;
        self.version.bump();
        Ok(popped)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.version.bump();
    }

    pub fn extend<I: IntoIterator<Item = Value>>(&mut self, values: I) {
        self.items.extend(values);
        self.version.bump();
    }

    pub fn is_subset(&self, other: &Set) -> bool {
        self.len() <= other.len() && self.items.iter().all(|v| other.contains(v))
    }

    pub fn is_superset(&self, other: &Set) -> bool {
        other.is_subset(self)
    }

    /// Elements of `self` not in `other`.
    pub fn difference(&self, other: &Set) -> Set {
        self.items
            .iter()
            .filter(|v| !other.contains(v))
            .cloned()
            .collect()
    }

    pub fn union(&self, other: &Set) -> Set {
        self.items.iter().chain(other.items.iter()).cloned().collect()
    }

    pub fn intersection(&self, other: &Set) -> Set {
        self.items
            .iter()
            .filter(|v| other.contains(v))
            .cloned()
            .collect()
    }

    /// Elements in exactly one of the two sets.
    pub fn symmetric_difference(&self, other: &Set) -> Set {
        self.items
            .symmetric_difference(&other.items)
            .cloned()
            .collect()
    }
}

impl Guarded for Set {
    type Item<'a> = &'a Value;

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn identity(&self) -> u64 {
        self.version.identity()
    }

    fn item_at(&self, position: usize) -> Option<(&Value, usize)> {
        self.items.get_index(position).map(|v| (v, position + 1))
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.len().hash(state);
        unordered_hash(self.items.iter()).hash(state);
    }
}

impl FromIterator<Value> for Set {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Set {
            items: iter.into_iter().collect(),
            version: Version::new(),
        }
    }
}

impl From<Vec<Value>> for Set {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
