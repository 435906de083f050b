//! The closed set of variant kinds a [`Value`](crate::Value) can hold.
//!
//! `Tag` discriminants are contiguous from 0 so they can index dispatch tables
//! directly. Numeric tags are declared in promotion-rank order, so for those
//! tags `rank()` is just the discriminant minus one.

use std::fmt;
use std::str::FromStr;

use crate::error::VarError;

/// Number of tags; the side length of every dispatch table.
pub const TAG_COUNT: usize = 17;

/// Discriminator for the active payload of a `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tag {
    None = 0,
    Bool = 1,
    U32 = 2,
    U64 = 3,
    U128 = 4,
    I32 = 5,
    I64 = 6,
    I128 = 7,
    F32 = 8,
    F64 = 9,
    Str = 10,
    List = 11,
    Set = 12,
    Dict = 13,
    OrderedSet = 14,
    OrderedDict = 15,
    Graph = 16,
}

impl Tag {
    /// Every tag in discriminant order.
    pub const ALL: [Tag; TAG_COUNT] = [
        Tag::None,
        Tag::Bool,
        Tag::U32,
        Tag::U64,
        Tag::U128,
        Tag::I32,
        Tag::I64,
        Tag::I128,
        Tag::F32,
        Tag::F64,
        Tag::Str,
        Tag::List,
        Tag::Set,
        Tag::Dict,
        Tag::OrderedSet,
        Tag::OrderedDict,
        Tag::Graph,
    ];

    /// Numeric tags in ascending promotion rank.
    pub const NUMERIC: [Tag; 9] = [
        Tag::Bool,
        Tag::U32,
        Tag::U64,
        Tag::U128,
        Tag::I32,
        Tag::I64,
        Tag::I128,
        Tag::F32,
        Tag::F64,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Tag> {
        Tag::ALL.get(index).copied()
    }

    /// Python-flavoured type name, as shown in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::None => "NoneType",
            Tag::Bool => "bool",
            Tag::U32 => "u32",
            Tag::U64 => "u64",
            Tag::U128 => "u128",
            Tag::I32 => "i32",
            Tag::I64 => "i64",
            Tag::I128 => "i128",
            Tag::F32 => "f32",
            Tag::F64 => "f64",
            Tag::Str => "str",
            Tag::List => "list",
            Tag::Set => "set",
            Tag::Dict => "dict",
            Tag::OrderedSet => "ordered_set",
            Tag::OrderedDict => "ordered_dict",
            Tag::Graph => "graph",
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self as u8, 1..=9)
    }

    /// Integer tags, `Bool` included.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self as u8, 1..=7)
    }

    /// `Bool` counts as unsigned for promotion purposes.
    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Tag::Bool | Tag::U32 | Tag::U64 | Tag::U128)
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Tag::I32 | Tag::I64 | Tag::I128)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Tag::F32 | Tag::F64)
    }

    #[inline]
    pub const fn is_heap(self) -> bool {
        self as u8 >= Tag::Str as u8
    }

    /// Heap kinds other than text.
    #[inline]
    pub const fn is_container(self) -> bool {
        self as u8 >= Tag::List as u8
    }

    /// Storage width in bits for numeric tags. `Bool` reports 0 so it never
    /// widens a mixed pair.
    pub const fn bit_width(self) -> Option<u32> {
        match self {
            Tag::Bool => Some(0),
            Tag::U32 | Tag::I32 | Tag::F32 => Some(32),
            Tag::U64 | Tag::I64 | Tag::F64 => Some(64),
            Tag::U128 | Tag::I128 => Some(128),
            _ => None,
        }
    }

    /// Promotion rank: Bool lowest, then unsigned widths, signed widths and
    /// float widths, each ascending.
    pub const fn rank(self) -> Option<u8> {
        if self.is_numeric() {
            Some(self as u8 - 1)
        } else {
            None
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = VarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.to_ascii_lowercase().as_str() {
            "none" | "nonetype" => Tag::None,
            "bool" => Tag::Bool,
            "u32" => Tag::U32,
            "u64" => Tag::U64,
            "u128" => Tag::U128,
            "i32" | "int" => Tag::I32,
            "i64" | "long" => Tag::I64,
            "i128" => Tag::I128,
            "f32" | "float" => Tag::F32,
            "f64" | "double" => Tag::F64,
            "str" | "string" | "text" => Tag::Str,
            "list" => Tag::List,
            "set" => Tag::Set,
            "dict" | "map" => Tag::Dict,
            "ordered_set" | "orderedset" => Tag::OrderedSet,
            "ordered_dict" | "ordereddict" => Tag::OrderedDict,
            "graph" => Tag::Graph,
            other => {
                return Err(VarError::InvalidValue(format!("unknown type name '{other}'")));
            }
        };
        Ok(tag)
    }
}
