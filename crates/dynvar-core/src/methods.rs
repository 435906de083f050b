//! Text and sequence methods on [`Value`].
//!
//! Text methods require a `Str` receiver and return new values; the receiver
//! is never modified. Character positions count Unicode scalar values, not
//! bytes. `count`, `reversed` and `slice` also accept a `List` receiver.

use crate::error::{Result, VarError};
use crate::value::Value;

fn map_text(value: &Value, f: impl FnOnce(&str) -> String) -> Result<Value> {
    Ok(Value::text(f(value.as_str()?)))
}

fn test_chars(value: &Value, pred: impl Fn(char) -> bool) -> Result<bool> {
    let s = value.as_str()?;
    Ok(!s.is_empty() && s.chars().all(pred))
}

/// Resolved `(start, stop, step)` of a slice over `len` items. Mirrors the
/// clamping rules of Python's `slice.indices`.
fn slice_indices(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<(i128, i128, i128)> {
    let step = i128::from(step.unwrap_or(1));
    if step == 0 {
        return Err(VarError::InvalidValue("slice step cannot be zero".into()));
    }
    let len = len as i128;
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: Option<i64>, default: i128| match bound.map(i128::from) {
        None => default,
        Some(b) if b < 0 => (b + len).max(lower),
        Some(b) => b.min(upper),
    };
    let start = clamp(start, if step > 0 { lower } else { upper });
    let stop = clamp(stop, if step > 0 { upper } else { lower });
    Ok((start, stop, step))
}

fn slice_positions(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<impl Iterator<Item = usize>> {
    let (start, stop, step) = slice_indices(len, start, stop, step)?;
    let mut next = Some(start);
    Ok(std::iter::from_fn(move || {
        let at = next?;
        let inside = if step > 0 { at < stop } else { at > stop };
        if !inside {
            next = None;
            return None;
        }
        next = at.checked_add(step);
        Some(at as usize)
    }))
}

impl Value {
    pub fn upper(&self) -> Result<Value> {
        map_text(self, str::to_uppercase)
    }

    pub fn lower(&self) -> Result<Value> {
        map_text(self, str::to_lowercase)
    }

    /// First character upper-cased, the rest lower-cased.
    pub fn capitalize(&self) -> Result<Value> {
        map_text(self, |s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect(),
                None => String::new(),
            }
        })
    }

    /// Each whitespace-separated word capitalized; whitespace is kept as is.
    pub fn title(&self) -> Result<Value> {
        map_text(self, |s| {
            let mut out = String::with_capacity(s.len());
            let mut word_start = true;
            for c in s.chars() {
                if c.is_whitespace() {
                    word_start = true;
                    out.push(c);
                } else if word_start {
                    out.extend(c.to_uppercase());
                    word_start = false;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            out
        })
    }

    pub fn strip(&self) -> Result<Value> {
        map_text(self, |s| s.trim().to_owned())
    }

    pub fn lstrip(&self) -> Result<Value> {
        map_text(self, |s| s.trim_start().to_owned())
    }

    pub fn rstrip(&self) -> Result<Value> {
        map_text(self, |s| s.trim_end().to_owned())
    }

    /// Every non-overlapping occurrence of `from` replaced by `to`.
    pub fn replace_all(&self, from: &str, to: &str) -> Result<Value> {
        map_text(self, |s| s.replace(from, to))
    }

    /// Character position of the first occurrence of `needle`, or -1.
    pub fn find(&self, needle: &str) -> Result<i64> {
        let s = self.as_str()?;
        Ok(match s.find(needle) {
            Some(byte) => s[..byte].chars().count() as i64,
            None => -1,
        })
    }

    pub fn starts_with(&self, prefix: &str) -> Result<bool> {
        Ok(self.as_str()?.starts_with(prefix))
    }

    pub fn ends_with(&self, suffix: &str) -> Result<bool> {
        Ok(self.as_str()?.ends_with(suffix))
    }

    /// Non-empty and every character a decimal digit.
    pub fn is_digits(&self) -> Result<bool> {
        test_chars(self, |c| c.is_ascii_digit())
    }

    pub fn is_alphabetic(&self) -> Result<bool> {
        test_chars(self, char::is_alphabetic)
    }

    pub fn is_alphanumeric(&self) -> Result<bool> {
        test_chars(self, char::is_alphanumeric)
    }

    pub fn is_whitespace(&self) -> Result<bool> {
        test_chars(self, char::is_whitespace)
    }

    /// Split into a list of text. `None` splits on runs of whitespace and
    /// drops empty pieces; a separator keeps them.
    pub fn split(&self, separator: Option<&str>) -> Result<Value> {
        let s = self.as_str()?;
        let pieces: Vec<Value> = match separator {
            None => s.split_whitespace().map(Value::from).collect(),
            Some("") => return Err(VarError::InvalidValue("empty separator".into())),
            Some(sep) => s.split(sep).map(Value::from).collect(),
        };
        Ok(Value::from(pieces))
    }

    /// Concatenate the text elements of `items` with this text between them.
    pub fn join(&self, items: &Value) -> Result<Value> {
        let sep = self.as_str()?;
        let elements = items.elements()?;
        let parts = elements
            .iter()
            .map(Value::as_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::text(parts.join(sep)))
    }

    /// Pad both sides with `fill` to `width` characters; the extra character
    /// of an odd padding goes to the right.
    pub fn center(&self, width: usize, fill: char) -> Result<Value> {
        map_text(self, |s| {
            let len = s.chars().count();
            if width <= len {
                return s.to_owned();
            }
            let left = (width - len) / 2;
            let right = width - len - left;
            let pad = |n| std::iter::repeat_n(fill, n);
            pad(left).chain(s.chars()).chain(pad(right)).collect()
        })
    }

    /// Left-pad with zeros to `width` characters, after any leading sign.
    pub fn zfill(&self, width: usize) -> Result<Value> {
        map_text(self, |s| {
            let len = s.chars().count();
            if width <= len {
                return s.to_owned();
            }
            let (sign, digits) = match s.strip_prefix(['+', '-']) {
                Some(rest) => (&s[..1], rest),
                None => ("", s),
            };
            format!("{sign}{}{digits}", "0".repeat(width - len))
        })
    }

    /// Occurrences of `needle`: non-overlapping substrings of text, or
    /// elements of a list equal to it.
    pub fn count(&self, needle: &Value) -> Result<usize> {
        match self {
            Value::Str(t) => {
                let sub = needle.as_str()?;
                if sub.is_empty() {
                    return Ok(t.char_len() + 1);
                }
                Ok(t.as_str().matches(sub).count())
            }
            Value::List(l) => Ok(l.count(needle)),
            other => Err(VarError::mismatch("str or list", other.tag())),
        }
    }

    /// A reversed copy of text or a list.
    pub fn reversed(&self) -> Result<Value> {
        match self {
            Value::Str(t) => Ok(Value::text(t.as_str().chars().rev().collect::<String>())),
            Value::List(l) => Ok(Value::list(l.iter().rev().cloned())),
            other => Err(VarError::mismatch("str or list", other.tag())),
        }
    }

    /// `value[start:stop:step]` over text or a list. Bounds may be negative
    /// and are clamped; `None` takes the default for the step's direction.
    pub fn slice(
        &self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Value> {
        match self {
            Value::Str(t) => {
                let chars: Vec<char> = t.as_str().chars().collect();
                let picked: String = slice_positions(chars.len(), start, stop, step)?
                    .map(|i| chars[i])
                    .collect();
                Ok(Value::text(picked))
            }
            Value::List(l) => {
                let items = l.as_slice();
                let picked = slice_positions(items.len(), start, stop, step)?;
                Ok(Value::list(picked.map(|i| items[i].clone())))
            }
            other => Err(VarError::mismatch("str or list", other.tag())),
        }
    }
}
