//! # dynvar-core
//!
//! A dynamically-typed [`Value`] for Rust: one type that holds absence, a
//! boolean, integers and floats of several widths, text, and container kinds
//! (list, set, dict, their insertion-ordered forms, and a graph).
//!
//! Binary operators are resolved in O(1) through per-operator function-pointer
//! tables indexed by the two operand tags. Integer arithmetic follows a
//! configurable overflow [`Policy`], and heap containers carry a version
//! counter so a [`Cursor`] can detect mutation during traversal.
//!
//! ## Quick start
//!
//! ```rust
//! use dynvar_core::{ops, Policy, Tag, Value};
//!
//! let a = Value::from(200u32);
//! let b = Value::from(100u32);
//! assert_eq!(ops::add(&a, &b).unwrap(), Value::from(300u32));
//!
//! // Throw is the default for named functions; Promote widens instead.
//! let big = Value::from(u32::MAX);
//! assert!(ops::add(&big, &b).is_err());
//! let widened = ops::add_with(&big, &b, Policy::Promote).unwrap();
//! assert_eq!(widened.tag(), Tag::U64);
//!
//! // True division always yields a float.
//! let q = ops::div(&Value::from(4), &Value::from(2)).unwrap();
//! assert_eq!(q, Value::F64(2.0));
//!
//! let words = Value::list([Value::from("a"), Value::from("b")]);
//! assert_eq!(words.to_string(), "['a', 'b']");
//! ```
//!
//! ## Modules
//!
//! - [`tag`]: the closed set of variant kinds and their promotion ranks
//! - [`value`]: the `Value` enum with construction, accessors, key equality and display
//! - [`heap`]: text, list, set, dict, ordered set/dict and graph payloads
//! - [`dispatch`]: `BinaryOp`, dispatch tables and the global registry
//! - [`policy`] / [`promotion`] / [`arith`]: overflow policy and numeric kernels
//! - [`ops`]: named operator functions and `std::ops` impls
//! - text methods (`upper`, `split`, `join`, ...) and slicing live directly on [`Value`]
//! - [`guard`]: version counters and guarded cursors
//! - [`convert`] / [`json`]: conversions and serde interop
//! - [`error`]: error types

pub mod arith;
mod container;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod heap;
pub mod json;
mod methods;
pub mod ops;
pub mod policy;
pub mod promotion;
pub mod tag;
pub mod value;

pub use dispatch::{dispatch, BinaryFn, BinaryOp, DispatchTable, Dispatcher};
pub use error::{ErrorKind, Result, VarError};
pub use guard::{Cursor, Guarded, Item, Version};
pub use heap::{Dict, Edge, Graph, List, Node, OrderedDict, OrderedSet, Set, Text};
pub use policy::Policy;
pub use tag::{Tag, TAG_COUNT};
pub use value::Value;
