//! The dynamically-typed [`Value`].
//!
//! Scalars live inline; heap variants live behind an owning `Box`, so a
//! `Value` is a fixed-size tagged union whatever it holds. `Clone` deep-copies
//! heap payloads, so two values never share one. [`Value::take`] moves the
//! payload out and leaves `None` behind.
//!
//! # Equality
//!
//! The `PartialEq`/`Eq`/`Hash` impls define *key* semantics, used by the hash
//! containers: numerics are compared by mathematical value across widths and
//! NaN equals NaN, so every value can be stored in a set or used as a map key.
//! The `==` *operator* of the dispatch engine ([`Value::equals`]) follows IEEE
//! rules instead and reports NaN as unequal to itself.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use num_traits::Float;

use crate::error::{Result, VarError};
use crate::heap::{Dict, Graph, List, OrderedDict, OrderedSet, Set, Text};
use crate::promotion::Num;
use crate::tag::Tag;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    U32(u32),
    U64(u64),
    U128(u128),
    I32(i32),
    I64(i64),
    I128(i128),
    F32(f32),
    F64(f64),
    Str(Box<Text>),
    List(Box<List>),
    Set(Box<Set>),
    Dict(Box<Dict>),
    OrderedSet(Box<OrderedSet>),
    OrderedDict(Box<OrderedDict>),
    Graph(Box<Graph>),
}

// ============================================================================
// Construction
// ============================================================================

impl Value {
    pub const fn none() -> Self {
        Value::None
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Str(Box::new(Text::from(s.into())))
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(Box::new(items.into_iter().collect()))
    }

    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Set(Box::new(items.into_iter().collect()))
    }

    pub fn dict<I: IntoIterator<Item = (Value, Value)>>(pairs: I) -> Self {
        Value::Dict(Box::new(pairs.into_iter().collect()))
    }

    pub fn ordered_set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::OrderedSet(Box::new(items.into_iter().collect()))
    }

    pub fn ordered_dict<I: IntoIterator<Item = (Value, Value)>>(pairs: I) -> Self {
        Value::OrderedDict(Box::new(pairs.into_iter().collect()))
    }

    /// A graph with `nodes` isolated nodes.
    pub fn graph(nodes: usize) -> Self {
        Value::Graph(Box::new(Graph::with_nodes(nodes)))
    }
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

from_scalar! {
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

macro_rules! from_heap {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(Box::new(v))
                }
            }
        )*
    };
}

from_heap! {
    Text => Str,
    List => List,
    Set => Set,
    Dict => Dict,
    OrderedSet => OrderedSet,
    OrderedDict => OrderedDict,
    Graph => Graph,
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Box::new(List::from(items)))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::list(iter)
    }
}

// ============================================================================
// Introspection
// ============================================================================

impl Value {
    #[inline]
    pub const fn tag(&self) -> Tag {
        match self {
            Value::None => Tag::None,
            Value::Bool(_) => Tag::Bool,
            Value::U32(_) => Tag::U32,
            Value::U64(_) => Tag::U64,
            Value::U128(_) => Tag::U128,
            Value::I32(_) => Tag::I32,
            Value::I64(_) => Tag::I64,
            Value::I128(_) => Tag::I128,
            Value::F32(_) => Tag::F32,
            Value::F64(_) => Tag::F64,
            Value::Str(_) => Tag::Str,
            Value::List(_) => Tag::List,
            Value::Set(_) => Tag::Set,
            Value::Dict(_) => Tag::Dict,
            Value::OrderedSet(_) => Tag::OrderedSet,
            Value::OrderedDict(_) => Tag::OrderedDict,
            Value::Graph(_) => Tag::Graph,
        }
    }

    pub const fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub const fn is_numeric(&self) -> bool {
        self.tag().is_numeric()
    }

    pub const fn is_integer(&self) -> bool {
        self.tag().is_integer()
    }

    pub const fn is_float(&self) -> bool {
        self.tag().is_float()
    }

    pub const fn is_container(&self) -> bool {
        self.tag().is_container()
    }

    /// Truthiness: `None`, `false`, numeric zero, and empty text, containers
    /// and graphs are false. NaN is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::U32(v) => *v != 0,
            Value::U64(v) => *v != 0,
            Value::U128(v) => *v != 0,
            Value::I32(v) => *v != 0,
            Value::I64(v) => *v != 0,
            Value::I128(v) => *v != 0,
            Value::F32(v) => *v != 0.0,
            Value::F64(v) => *v != 0.0,
            Value::Str(t) => !t.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Set(s) => !s.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::OrderedSet(s) => !s.is_empty(),
            Value::OrderedDict(d) => !d.is_empty(),
            Value::Graph(g) => !g.is_empty(),
        }
    }

    /// Move the payload out in O(1), leaving `None` behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    /// Install `value`, returning the previous payload.
    pub fn replace(&mut self, value: Value) -> Value {
        std::mem::replace(self, value)
    }
}

// ============================================================================
// Accessors
// ============================================================================

macro_rules! scalar_accessors {
    ($($variant:ident: $ty:ty => $is:ident, $as:ident, $unchecked:ident;)*) => {
        impl Value {
            $(
                pub const fn $is(&self) -> bool {
                    matches!(self, Value::$variant(_))
                }

                pub fn $as(&self) -> Result<$ty> {
                    match self {
                        Value::$variant(v) => Ok(*v),
                        other => Err(VarError::mismatch(Tag::$variant.name(), other.tag())),
                    }
                }

                /// # Safety
                ///
                #[doc = concat!("The caller must have verified that the tag is `Tag::", stringify!($variant), "`.")]
                #[inline]
                pub unsafe fn $unchecked(&self) -> $ty {
                    match self {
                        Value::$variant(v) => *v,
                        // SAFETY: upheld by the caller.
                        _ => unsafe { std::hint::unreachable_unchecked() },
                    }
                }
            )*
        }
    };
}

scalar_accessors! {
    Bool: bool => is_bool, as_bool, as_bool_unchecked;
    U32: u32 => is_u32, as_u32, as_u32_unchecked;
    U64: u64 => is_u64, as_u64, as_u64_unchecked;
    U128: u128 => is_u128, as_u128, as_u128_unchecked;
    I32: i32 => is_i32, as_i32, as_i32_unchecked;
    I64: i64 => is_i64, as_i64, as_i64_unchecked;
    I128: i128 => is_i128, as_i128, as_i128_unchecked;
    F32: f32 => is_f32, as_f32, as_f32_unchecked;
    F64: f64 => is_f64, as_f64, as_f64_unchecked;
}

macro_rules! heap_accessors {
    ($($variant:ident: $ty:ty => $is:ident, $as:ident, $as_mut:ident, $unchecked:ident;)*) => {
        impl Value {
            $(
                pub const fn $is(&self) -> bool {
                    matches!(self, Value::$variant(_))
                }

                pub fn $as(&self) -> Result<&$ty> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(VarError::mismatch(Tag::$variant.name(), other.tag())),
                    }
                }

                pub fn $as_mut(&mut self) -> Result<&mut $ty> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(VarError::mismatch(Tag::$variant.name(), other.tag())),
                    }
                }

                /// # Safety
                ///
                #[doc = concat!("The caller must have verified that the tag is `Tag::", stringify!($variant), "`.")]
                #[inline]
                pub unsafe fn $unchecked(&self) -> &$ty {
                    match self {
                        Value::$variant(v) => v,
                        // SAFETY: upheld by the caller.
                        _ => unsafe { std::hint::unreachable_unchecked() },
                    }
                }
            )*
        }
    };
}

heap_accessors! {
    Str: Text => is_str, as_text, as_text_mut, as_text_unchecked;
    List: List => is_list, as_list, as_list_mut, as_list_unchecked;
    Set: Set => is_set, as_set, as_set_mut, as_set_unchecked;
    Dict: Dict => is_dict, as_dict, as_dict_mut, as_dict_unchecked;
    OrderedSet: OrderedSet => is_ordered_set, as_ordered_set, as_ordered_set_mut, as_ordered_set_unchecked;
    OrderedDict: OrderedDict => is_ordered_dict, as_ordered_dict, as_ordered_dict_mut, as_ordered_dict_unchecked;
    Graph: Graph => is_graph, as_graph, as_graph_mut, as_graph_unchecked;
}

impl Value {
    pub fn as_str(&self) -> Result<&str> {
        self.as_text().map(Text::as_str)
    }
}

// ============================================================================
// Key equality and hashing
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::OrderedSet(a), Value::OrderedSet(b)) => a == b,
            (Value::OrderedDict(a), Value::OrderedDict(b)) => a == b,
            (Value::Graph(a), Value::Graph(b)) => a == b,
            _ => match (Num::of(self), Num::of(other)) {
                (Some(a), Some(b)) => a.key_eq(b),
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::None => 0u8.hash(state),
            Value::Str(t) => {
                1u8.hash(state);
                t.hash(state);
            }
            Value::List(l) => {
                2u8.hash(state);
                l.hash(state);
            }
            Value::Set(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Dict(d) => {
                4u8.hash(state);
                d.hash(state);
            }
            Value::OrderedSet(s) => {
                5u8.hash(state);
                s.hash(state);
            }
            Value::OrderedDict(d) => {
                6u8.hash(state);
                d.hash(state);
            }
            Value::Graph(g) => {
                7u8.hash(state);
                g.hash(state);
            }
            scalar => {
                if let Some(num) = Num::of(scalar) {
                    num.hash_key(state);
                }
            }
        }
    }
}

// ============================================================================
// Display
// ============================================================================

fn format_float<F: Float + fmt::Debug>(f: F, out: &mut impl fmt::Write) -> fmt::Result {
    if f.is_nan() {
        out.write_str("nan")
    } else if f.is_infinite() {
        out.write_str(if f.is_sign_positive() { "inf" } else { "-inf" })
    } else {
        write!(out, "{f:?}")
    }
}

impl Value {
    /// Python-style `repr`: like `Display` but text is quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_repr(&mut out);
        out
    }

    fn write_repr(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Value::Str(t) => {
                out.write_char('\'')?;
                for ch in t.as_str().chars() {
                    match ch {
                        '\'' => out.write_str("\\'")?,
                        '\\' => out.write_str("\\\\")?,
                        '\n' => out.write_str("\\n")?,
                        '\t' => out.write_str("\\t")?,
                        _ => out.write_char(ch)?,
                    }
                }
                out.write_char('\'')
            }
            other => write!(out, "{other}"),
        }
    }

    fn write_seq<'a>(
        out: &mut fmt::Formatter<'_>,
        open: &str,
        close: &str,
        items: impl Iterator<Item = &'a Value>,
    ) -> fmt::Result {
        out.write_str(open)?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            item.write_repr(out)?;
        }
        out.write_str(close)
    }

    fn write_map<'a>(
        out: &mut fmt::Formatter<'_>,
        entries: impl Iterator<Item = (&'a Value, &'a Value)>,
    ) -> fmt::Result {
        out.write_char('{')?;
        for (i, (k, v)) in entries.enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            k.write_repr(out)?;
            out.write_str(": ")?;
            v.write_repr(out)?;
        }
        out.write_char('}')
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::U128(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::I128(v) => write!(f, "{v}"),
            Value::F32(v) => format_float(*v, f),
            Value::F64(v) => format_float(*v, f),
            Value::Str(t) => f.write_str(t.as_str()),
            Value::List(l) => Self::write_seq(f, "[", "]", l.iter()),
            Value::Set(s) if s.is_empty() => f.write_str("set()"),
            Value::Set(s) => Self::write_seq(f, "{", "}", s.iter()),
            Value::OrderedSet(s) => Self::write_seq(f, "OrderedSet([", "])", s.iter()),
            Value::Dict(d) => Self::write_map(f, d.iter()),
            Value::OrderedDict(d) => {
                f.write_str("OrderedDict(")?;
                Self::write_map(f, d.iter())?;
                f.write_char(')')
            }
            Value::Graph(g) => write!(f, "<Graph nodes={} edges={}>", g.node_count(), g.edge_count()),
        }
    }
}
