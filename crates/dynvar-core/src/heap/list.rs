use std::hash::{Hash, Hasher};

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};
use crate::heap::{resolve_index, resolve_insert_index};
use crate::value::Value;

/// Ordered, growable sequence of values.
#[derive(Debug, Clone, Default)]
pub struct List {
    items: Vec<Value>,
    version: Version,
}

impl List {
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

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Element at `index`; negative indices count from the end.
    pub fn get(&self, index: i64) -> Result<&Value> {
        let at = resolve_index(index, self.items.len())?;
        Ok(&self.items[at])
    }

    /// Mutable element access. Replacing an element is not a structural
    /// change.
    pub fn get_mut(&mut self, index: i64) -> Result<&mut Value> {
        let at = resolve_index(index, self.items.len())?;
        Ok(&mut self.items[at])
    }

    /// Membership by the equality operator's rules.
    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item.equals(value))
    }

    pub fn position(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|item| item.equals(value))
    }

    /// Number of elements equal to `value`.
    pub fn count(&self, value: &Value) -> usize {
        self.items.iter().filter(|item| item.equals(value)).count()
    }

    /// Reverse in place. Counts as a structural change.
    pub fn reverse(&mut self) {
        self.items.reverse();
        self.version.bump();
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
        self.version.bump();
    }

    /// Insert before `index`. Positions past either end clamp.
    pub fn insert(&mut self, index: i64, value: Value) {
        let at = resolve_insert_index(index, self.items.len());
        self.items.insert(at, value);
        self.version.bump();
    }

    pub fn remove(&mut self, index: i64) -> Result<Value> {
        let at = resolve_index(index, self.items.len())?;
        let removed = self.items.remove(at);
        self.version.bump();
        Ok(removed)
    }

    /// Remove the first element equal to `value`.
    pub fn remove_value(&mut self, value: &Value) -> Result<Value> {
        let at = self
            .position(value)
            .ok_or_else(|| VarError::InvalidValue(format!("{} not in list", value.repr())))?;
        let removed = self.items.remove(at);
        self.version.bump();
        Ok(removed)
    }

    pub fn pop(&mut self) -> Result<Value> {
        let popped = self
            .items
            .pop()
            .ok_or(VarError::IndexOutOfRange { index: -1, len: 0 })?;
        self.version.bump();
        Ok(popped)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.version.bump();
    }

    /// Bulk append; one version bump for the whole call.
    pub fn extend<I: IntoIterator<Item = Value>>(&mut self, values: I) {
        self.items.extend(values);
        self.version.bump();
    }
}

impl Guarded for List {
    type Item<'a> = &'a Value;

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn identity(&self) -> u64 {
        self.version.identity()
    }

    fn item_at(&self, position: usize) -> Option<(&Value, usize)> {
        self.items.get(position).map(|v| (v, position + 1))
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for List {}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List {
            items,
            version: Version::new(),
        }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
