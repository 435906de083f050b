//! Dynamic container protocol on [`Value`].
//!
//! These forward to the typed heap methods after checking the tag, so a
//! caller holding an untyped `Value` can treat every container alike.
//! Positions are integers (negative counts from the end); map keys are any
//! value.

use crate::error::{Result, VarError};
use crate::guard::Cursor;
use crate::promotion::Num;
use crate::value::Value;

const CONTAINER: &str = "container";

/// Integer position from an index value.
fn position(index: &Value) -> Result<i64> {
    match Num::of(index) {
        Some(Num::Int(i)) if index.is_integer() => i64::try_from(i).map_err(|_| {
            VarError::IndexOutOfRange {
                index: if i < 0 { i64::MIN } else { i64::MAX },
                len: 0,
            }
        }),
        Some(Num::Huge(_)) => Err(VarError::IndexOutOfRange {
            index: i64::MAX,
            len: 0,
        }),
        _ => Err(VarError::mismatch("integer index", index.tag())),
    }
}

impl Value {
    /// Element count. Text counts characters; graphs count nodes.
    pub fn len(&self) -> Result<usize> {
        match self {
            Value::Str(t) => Ok(t.char_len()),
            Value::List(l) => Ok(l.len()),
            Value::Set(s) => Ok(s.len()),
            Value::Dict(d) => Ok(d.len()),
            Value::OrderedSet(s) => Ok(s.len()),
            Value::OrderedDict(d) => Ok(d.len()),
            Value::Graph(g) => Ok(g.node_count()),
            other => Err(VarError::mismatch(CONTAINER, other.tag())),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Membership. Text tests for a substring, maps test keys, graphs test
    /// node ids.
    pub fn contains(&self, item: &Value) -> Result<bool> {
        match self {
            Value::Str(t) => Ok(t.as_str().contains(item.as_str()?)),
            Value::List(l) => Ok(l.contains(item)),
            Value::Set(s) => Ok(s.contains(item)),
            Value::Dict(d) => Ok(d.contains_key(item)),
            Value::OrderedSet(s) => Ok(s.contains(item)),
            Value::OrderedDict(d) => Ok(d.contains_key(item)),
            Value::Graph(g) => Ok(position(item)
                .ok()
                .and_then(|id| usize::try_from(id).ok())
                .is_some_and(|id| id < g.node_count())),
            other => Err(VarError::mismatch(CONTAINER, other.tag())),
        }
    }

    /// Element by position (List, OrderedSet, Str) or by key (Dict,
    /// OrderedDict). Graphs return the node's metadata, `None` if unset.
    pub fn get(&self, key: &Value) -> Result<Value> {
        match self {
            Value::Str(t) => {
                let len = t.char_len();
                let at = crate::heap::resolve_index(position(key)?, len)?;
                let ch = t.char_at(at).ok_or(VarError::IndexOutOfRange {
                    index: at as i64,
                    len,
                })?;
                Ok(Value::text(ch.to_string()))
            }
            Value::Graph(g) => {
                let at = crate::heap::resolve_index(position(key)?, g.node_count())?;
                Ok(g.node_data(at).cloned().unwrap_or_default())
            }
            _ => self.get_ref(key).cloned(),
        }
    }

    /// Borrowing form of [`get`](Self::get) for kinds that store values.
    pub fn get_ref(&self, key: &Value) -> Result<&Value> {
        match self {
            Value::List(l) => l.get(position(key)?),
            Value::OrderedSet(s) => s.get(position(key)?),
            Value::Dict(d) => d.get(key).ok_or_else(|| VarError::KeyNotFound(key.repr())),
            Value::OrderedDict(d) => d.get(key).ok_or_else(|| VarError::KeyNotFound(key.repr())),
            other => Err(VarError::mismatch("list or map", other.tag())),
        }
    }

    /// Replace a list element or insert/overwrite a map entry.
    pub fn set_item(&mut self, key: Value, value: Value) -> Result<()> {
        match self {
            Value::List(l) => {
                *l.get_mut(position(&key)?)? = value;
                Ok(())
            }
            Value::Dict(d) => {
                d.insert(key, value);
                Ok(())
            }
            Value::OrderedDict(d) => {
                d.insert(key, value);
                Ok(())
            }
            Value::Graph(g) => {
                let at = crate::heap::resolve_index(position(&key)?, g.node_count())?;
                g.set_node_data(at, value)
            }
            other => Err(VarError::mismatch("list or map", other.tag())),
        }
    }

    /// Push onto a list, insert into a set, or append text.
    pub fn append(&mut self, value: Value) -> Result<()> {
        match self {
            Value::List(l) => l.push(value),
            Value::Set(s) => {
                s.insert(value);
            }
            Value::OrderedSet(s) => {
                s.insert(value);
            }
            Value::Str(t) => t.push_str(value.as_str()?),
            other => return Err(VarError::mismatch("list, set or str", other.tag())),
        }
        Ok(())
    }

    /// Insert before `index` in a list, or insert a single character into
    /// text.
    pub fn insert_at(&mut self, index: i64, value: Value) -> Result<()> {
        match self {
            Value::List(l) => {
                l.insert(index, value);
                Ok(())
            }
            Value::Str(t) => {
                let s = value.as_str()?;
                let mut chars = s.chars();
                let (Some(ch), None) = (chars.next(), chars.next()) else {
                    return Err(VarError::InvalidValue(format!(
                        "expected a single character, got {}",
                        value.repr()
                    )));
                };
                let at = crate::heap::resolve_insert_index(index, t.char_len());
                t.insert(at, ch)
            }
            other => Err(VarError::mismatch("list or str", other.tag())),
        }
    }

    /// Remove an element by value (List, sets) or an entry by key (maps);
    /// returns what was removed. Lists raise `ValueError` when the element is
    /// absent, sets and maps raise `KeyError`.
    pub fn remove(&mut self, item: &Value) -> Result<Value> {
        match self {
            Value::List(l) => l.remove_value(item),
            Value::Set(s) => s.remove(item),
            Value::OrderedSet(s) => s.remove(item),
            Value::Dict(d) => d.remove(item),
            Value::OrderedDict(d) => d.remove(item),
            other => Err(VarError::mismatch(CONTAINER, other.tag())),
        }
    }

    /// Remove and return the last element (List, OrderedSet, Str) or an
    /// arbitrary one (Set).
    pub fn pop(&mut self) -> Result<Value> {
        match self {
            Value::List(l) => l.pop(),
            Value::Set(s) => s.pop(),
            Value::OrderedSet(s) => s.pop(),
            Value::Str(t) => {
                let len = t.char_len();
                if len == 0 {
                    return Err(VarError::IndexOutOfRange { index: -1, len: 0 });
                }
                t.remove(len - 1).map(|ch| Value::text(ch.to_string()))
            }
            other => Err(VarError::mismatch("list, set or str", other.tag())),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        match self {
            Value::Str(t) => t.clear(),
            Value::List(l) => l.clear(),
            Value::Set(s) => s.clear(),
            Value::Dict(d) => d.clear(),
            Value::OrderedSet(s) => s.clear(),
            Value::OrderedDict(d) => d.clear(),
            Value::Graph(g) => g.clear(),
            other => return Err(VarError::mismatch(CONTAINER, other.tag())),
        }
        Ok(())
    }

    /// Bulk update from another value: lists and sets take its elements,
    /// maps take its entries, text takes its text. One version bump.
    pub fn extend(&mut self, other: &Value) -> Result<()> {
        match self {
            Value::List(l) => l.extend(other.elements()?),
            Value::Set(s) => s.extend(other.elements()?),
            Value::OrderedSet(s) => s.extend(other.elements()?),
            Value::Dict(d) => d.update(other.entries()?),
            Value::OrderedDict(d) => d.update(other.entries()?),
            Value::Str(t) => t.push_str(other.as_str()?),
            this => return Err(VarError::mismatch(CONTAINER, this.tag())),
        }
        Ok(())
    }

    /// Owned copies of the elements of an iterable: list and set elements,
    /// map keys, or the characters of text.
    pub fn elements(&self) -> Result<Vec<Value>> {
        match self {
            Value::Str(t) => Ok(t.as_str().chars().map(|c| Value::text(c.to_string())).collect()),
            Value::List(l) => Ok(l.iter().cloned().collect()),
            Value::Set(s) => Ok(s.iter().cloned().collect()),
            Value::OrderedSet(s) => Ok(s.iter().cloned().collect()),
            Value::Dict(d) => Ok(d.keys().cloned().collect()),
            Value::OrderedDict(d) => Ok(d.keys().cloned().collect()),
            other => Err(VarError::mismatch("iterable", other.tag())),
        }
    }

    /// Owned copies of a map's entries.
    pub fn entries(&self) -> Result<Vec<(Value, Value)>> {
        match self {
            Value::Dict(d) => Ok(d.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            Value::OrderedDict(d) => Ok(d.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            other => Err(VarError::mismatch("dict or ordered_dict", other.tag())),
        }
    }

    /// Start a guarded traversal. Step it with [`Cursor::next`], passing
    /// this value each time.
    pub fn cursor(&self) -> Result<Cursor<Value>> {
        if !self.tag().is_heap() {
            return Err(VarError::mismatch(CONTAINER, self.tag()));
        }
        Ok(Cursor::new(self))
    }
}
