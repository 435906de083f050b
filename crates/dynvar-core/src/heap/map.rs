use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};
use crate::heap::unordered_hash;
use crate::value::Value;

/// Hash map from value keys to values. Two maps are equal when they hold the
/// same key-value pairs, whatever the order.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: IndexMap<Value, Value>,
    version: Version,
}

impl Dict {
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

    /// Mutable access to an existing entry's value; not structural.
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
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

    /// Insert or overwrite; returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let previous = self.entries.insert(key, value);
        self.version.bump();
        previous
    }

    pub fn remove(&mut self, key: &Value) -> Result<Value> {
        let removed = self
            .entries
            .swap_remove(key)
            .ok_or_else(|| VarError::KeyNotFound(key.repr()))?;
        self.version.bump();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.version.bump();
    }

    /// Bulk insert; one version bump for the whole call.
    pub fn update<I: IntoIterator<Item = (Value, Value)>>(&mut self, pairs: I) {
        self.entries.extend(pairs);
        self.version.bump();
    }

    /// Entries whose key is absent from `other`.
    pub fn key_difference(&self, other: &Dict) -> Dict {
        self.entries
            .iter()
            .filter(|(k, _)| !other.contains_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries whose key `other` also holds, with `self`'s values.
    pub fn key_intersection(&self, other: &Dict) -> Dict {
        self.entries
            .iter()
            .filter(|(k, _)| other.contains_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A copy of `self` updated with `other`; `other` wins on shared keys.
    pub fn merged(&self, other: &Dict) -> Dict {
        self.iter()
            .chain(other.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Guarded for Dict {
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

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl Eq for Dict {}

impl Hash for Dict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        unordered_hash(self.entries.iter()).hash(state);
    }
}

impl FromIterator<(Value, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Dict {
            entries: iter.into_iter().collect(),
            version: Version::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
