//! Conversions between tags, text parsing, and extraction into native types.
//!
//! [`Value::convert`] is the checked path: it fails rather than lose range.
//! [`Value::cast`] is the numeric fast path with Rust `as` semantics.

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use crate::error::{Result, VarError};
use crate::promotion::{fit, Exact, Num};
use crate::tag::Tag;
use crate::value::Value;

impl Value {
    /// Checked conversion to `target`.
    ///
    /// Numeric conversions are range checked (floats truncate toward zero
    /// first); text is parsed; every value converts to text and to `Bool`
    /// (by truthiness); iterables convert between list and set kinds; maps
    /// convert between map kinds and from lists of pairs. Anything else is a
    /// `TypeMismatch`.
    pub fn convert(&self, target: Tag) -> Result<Value> {
        if self.tag() == target {
            return Ok(self.clone());
        }
        match target {
            Tag::Bool => Ok(Value::Bool(self.truthy())),
            t if t.is_numeric() => self.to_numeric(t),
            Tag::Str => Ok(Value::text(self.to_string())),
            Tag::List => Ok(Value::list(self.elements()?)),
            Tag::Set => Ok(Value::set(self.elements()?)),
            Tag::OrderedSet => Ok(Value::ordered_set(self.elements()?)),
            Tag::Dict => Ok(Value::dict(self.pairs()?)),
            Tag::OrderedDict => Ok(Value::ordered_dict(self.pairs()?)),
            _ => Err(VarError::mismatch(target.name(), self.tag())),
        }
    }

    fn to_numeric(&self, target: Tag) -> Result<Value> {
        if let Value::Str(text) = self {
            let parsed = Value::parse_number(text.as_str())?;
            if target.is_integer() && parsed.is_float() {
                return Err(VarError::Conversion(format!(
                    "invalid literal for {target}: '{text}'"
                )));
            }
            return parsed.to_numeric(target);
        }
        let num = Num::of(self).ok_or_else(|| VarError::mismatch("numeric or str", self.tag()))?;

        if target.is_float() {
            let f = num.to_f64();
            return match target {
                Tag::F32 => {
                    let narrow = f as f32;
                    if f.is_finite() && !narrow.is_finite() {
                        return Err(out_of_range(self, target));
                    }
                    Ok(Value::F32(narrow))
                }
                _ => Ok(Value::F64(f)),
            };
        }

        let exact = match num {
            Num::Float(f) if !f.is_finite() => {
                return Err(VarError::Conversion(format!("cannot convert {f} to {target}")));
            }
            Num::Float(f) => BigInt::from_f64(f.trunc())
                .map(Exact::from)
                .ok_or_else(|| out_of_range(self, target))?,
            int => int.to_exact(),
        };
        fit(&exact, target).ok_or_else(|| out_of_range(self, target))
    }

    /// Unchecked numeric cast with `as` semantics: integer narrowing wraps,
    /// float to integer saturates (NaN becomes 0).
    pub fn cast(&self, target: Tag) -> Result<Value> {
        let num = Num::of(self).ok_or_else(|| VarError::mismatch("numeric", self.tag()))?;
        if !target.is_numeric() {
            return Err(VarError::InvalidValue(format!("cannot cast to {target}")));
        }
        let value = match num {
            Num::Float(f) => match target {
                Tag::Bool => Value::Bool(f != 0.0),
                Tag::U32 => Value::U32(f as u32),
                Tag::U64 => Value::U64(f as u64),
                Tag::U128 => Value::U128(f as u128),
                Tag::I32 => Value::I32(f as i32),
                Tag::I64 => Value::I64(f as i64),
                Tag::I128 => Value::I128(f as i128),
                Tag::F32 => Value::F32(f as f32),
                _ => Value::F64(f),
            },
            int => {
                let bits = int.bits();
                match target {
                    Tag::Bool => Value::Bool(bits != 0),
                    Tag::U32 => Value::U32(bits as u32),
                    Tag::U64 => Value::U64(bits as u64),
                    Tag::U128 => Value::U128(bits as u128),
                    Tag::I32 => Value::I32(bits as i32),
                    Tag::I64 => Value::I64(bits as i64),
                    Tag::I128 => Value::I128(bits),
                    Tag::F32 => Value::F32(int.to_f64() as f32),
                    _ => Value::F64(int.to_f64()),
                }
            }
        };
        Ok(value)
    }

    /// Parse numeric text. Integers become the first of `I64`, `U64`, `I128`,
    /// `U128` that holds them; anything else that parses as a float
    /// (including `inf` and `nan`) becomes `F64`.
    pub fn parse_number(text: &str) -> Result<Value> {
        let s = text.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Value::I64(v));
        }
        if let Ok(v) = s.parse::<u64>() {
            return Ok(Value::U64(v));
        }
        if let Ok(v) = s.parse::<i128>() {
            return Ok(Value::I128(v));
        }
        if let Ok(v) = s.parse::<u128>() {
            return Ok(Value::U128(v));
        }
        s.parse::<f64>()
            .map(Value::F64)
            .map_err(|_| VarError::Conversion(format!("could not convert '{text}' to a number")))
    }

    /// Map entries, or the pairs of a list of two-element lists.
    fn pairs(&self) -> Result<Vec<(Value, Value)>> {
        match self {
            Value::Dict(_) | Value::OrderedDict(_) => self.entries(),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::List(pair) if pair.len() == 2 => {
                        Ok((pair.get(0)?.clone(), pair.get(1)?.clone()))
                    }
                    other => Err(VarError::Conversion(format!(
                        "expected a key-value pair, found {}",
                        other.repr()
                    ))),
                })
                .collect(),
            other => Err(VarError::mismatch("map or list of pairs", other.tag())),
        }
    }
}

fn out_of_range(value: &Value, target: Tag) -> VarError {
    VarError::Conversion(format!("{} is out of range for {target}", value.repr()))
}

macro_rules! try_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl TryFrom<&Value> for $ty {
                type Error = VarError;

                fn try_from(value: &Value) -> Result<Self> {
                    match value.convert(Tag::$variant)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(VarError::mismatch(Tag::$variant.name(), other.tag())),
                    }
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = VarError;

                fn try_from(value: Value) -> Result<Self> {
                    <$ty>::try_from(&value)
                }
            }
        )*
    };
}

try_from_value! {
    bool => Bool,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    f32 => F32,
    f64 => F64,
}

impl TryFrom<&Value> for String {
    type Error = VarError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl TryFrom<Value> for String {
    type Error = VarError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Str(text) => Ok(text.into_string()),
            other => Err(VarError::mismatch("str", other.tag())),
        }
    }
}
