use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, VarError};
use crate::guard::{Guarded, Version};

/// Growable UTF-8 text buffer. Positions are character positions.
#[derive(Debug, Clone, Default)]
pub struct Text {
    buf: String,
    version: Version,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn char_len(&self) -> usize {
        self.buf.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        self.buf.chars().nth(position)
    }

    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn push(&mut self, ch: char) {
        self.buf.push(ch);
        self.version.bump();
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
        self.version.bump();
    }

    /// Insert `ch` before the character at `position`; `position == char_len()`
    /// appends.
    pub fn insert(&mut self, position: usize, ch: char) -> Result<()> {
        let offset = self.byte_offset(position, true)?;
        self.buf.insert(offset, ch);
        self.version.bump();
        Ok(())
    }

    pub fn remove(&mut self, position: usize) -> Result<char> {
        let offset = self.byte_offset(position, false)?;
        let ch = self.buf.remove(offset);
        self.version.bump();
        Ok(ch)
    }

    /// Keep the first `chars` characters.
    pub fn truncate(&mut self, chars: usize) {
        if let Some((offset, _)) = self.buf.char_indices().nth(chars) {
            self.buf.truncate(offset);
        }
        self.version.bump();
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.version.bump();
    }

    fn byte_offset(&self, position: usize, allow_end: bool) -> Result<usize> {
        match self.buf.char_indices().nth(position) {
            Some((offset, _)) => Ok(offset),
            None if allow_end && position == self.char_len() => Ok(self.buf.len()),
            None => Err(VarError::IndexOutOfRange {
                index: position as i64,
                len: self.char_len(),
            }),
        }
    }
}

impl Guarded for Text {
    type Item<'a> = char;

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn identity(&self) -> u64 {
        self.version.identity()
    }

    fn item_at(&self, position: usize) -> Option<(char, usize)> {
        let ch = self.buf.get(position..)?.chars().next()?;
        Some((ch, position + ch.len_utf8()))
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl Eq for Text {}

impl PartialOrd for Text {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Text {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.buf.cmp(&other.buf)
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.buf.hash(state);
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl From<String> for Text {
    fn from(buf: String) -> Self {
        Text {
            buf,
            version: Version::new(),
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::from(s.to_string())
    }
}
