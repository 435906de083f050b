//! Insertion-ordered set and map.
//!
//! Unlike [`Set`](super::Set) and [`Dict`](super::Dict), order is part of the
//! value: removal keeps the remaining entries in place and two containers
//! holding the same entries in a different order are not equal.

use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};
use crate::heap::resolve_index;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: IndexSet<Value>,
    version: Version,
}

impl OrderedSet {
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

    pub fn get(&self, index: i64) -> Result<&Value> {
        let at = resolve_index(index, self.items.len())?;
        Ok(&self.items[at])
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.items.iter()
    }

    /// Appends if absent; an existing element keeps its position.
    pub fn insert(&mut self, value: Value) -> bool {
        let added = self.items.insert(value);
        self.version.bump();
        added
    }

    pub fn remove(&mut self, value: &Value) -> Result<Value> {
        let removed = self
            .items
            .shift_take(value)
            .ok_or_else(|| VarError::KeyNotFound(value.repr()))?;
        self.version.bump();
        Ok(removed)
    }

    pub fn discard(&mut self, value: &Value) -> bool {
        let removed = self.items.shift_remove(value);
        self.version.bump();
        removed
    }

    /// Remove and return the most recently inserted element.
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

    /// Elements of `self` not in `other`, in `self`'s order.
    pub fn difference(&self, other: &OrderedSet) -> OrderedSet {
        self.items
            .iter()
            .filter(|v| !other.contains(v))
            .cloned()
            .collect()
    }

    /// `self`'s elements in order, then `other`'s new ones.
    pub fn union(&self, other: &OrderedSet) -> OrderedSet {
        self.items.union(&other.items).cloned().collect()
    }

    pub fn intersection(&self, other: &OrderedSet) -> OrderedSet {
        self.items.intersection(&other.items).cloned().collect()
    }

    /// `self`'s elements missing from `other`, then `other`'s missing from
    /// `self`.
    pub fn symmetric_difference(&self, other: &OrderedSet) -> OrderedSet {
        self.items
            .symmetric_difference(&other.items)
            .cloned()
            .collect()
    }
}

impl Guarded for OrderedSet {
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

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().eq(other.items.iter())
    }
}

impl Eq for OrderedSet {}

impl Hash for OrderedSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.len().hash(state);
        for item in &self.items {
            item.hash(state);
        }
    }
}

impl FromIterator<Value> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        OrderedSet {
            items: iter.into_iter().collect(),
            version: Version::new(),
        }
    }
}

impl From<Vec<Value>> for OrderedSet {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderedDict {
    entries: IndexMap<Value, Value>,
    version: Version,
}

impl OrderedDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&Value, &Value)> {
        self.entries.get_index(index)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    /// Insert or overwrite. Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let previous = self.entries.insert(key, value);
        self.version.bump();
        previous
    }

    pub fn remove(&mut self, key: &Value) -> Result<Value> {
        let removed = self
            .entries
            .shift_remove(key)
            .ok_or_else(|| VarError::KeyNotFound(key.repr()))?;
        self.version.bump();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.version.bump();
    }

    pub fn update<I: IntoIterator<Item = (Value, Value)>>(&mut self, pairs: I) {
        self.entries.extend(pairs);
        self.version.bump();
    }

    pub fn key_difference(&self, other: &OrderedDict) -> OrderedDict {
        self.entries
            .iter()
            .filter(|(k, _)| !other.contains_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn key_intersection(&self, other: &OrderedDict) -> OrderedDict {
        self.entries
            .iter()
            .filter(|(k, _)| other.contains_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A copy of `self` updated with `other`: shared keys keep their position
    /// and take `other`'s value, new keys append.
    pub fn merged(&self, other: &OrderedDict) -> OrderedDict {
        self.iter()
            .chain(other.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Guarded for OrderedDict {
    type Item<'a> = (&'a Value, &'a Value);

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn identity(&self) -> u64 {
        self.version.identity()
    }

    fn item_at(&self, position: usize) -> Option<((&Value, &Value), usize)> {
        self.entries
            .get_index(position)
            .map(|entry| (entry, position + 1))
    }
}

impl PartialEq for OrderedDict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for OrderedDict {}

impl Hash for OrderedDict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for (k, v) in &self.entries {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl FromIterator<(Value, Value)> for OrderedDict {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        OrderedDict {
            entries: iter.into_iter().collect(),
            version: Version::new(),
        }
    }
}

impl<'a> IntoIterator for &'a OrderedDict {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
