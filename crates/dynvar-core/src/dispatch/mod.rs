//! Binary operator dispatch.
//!
//! Each operator owns a [`DispatchTable`]: a `TAG_COUNT × TAG_COUNT` array of
//! function pointers indexed by the operand tags. Dispatch is one indexed load
//! and one indirect call. Unsupported cells hold a per-operator sentinel that
//! fails with [`VarError::UnsupportedOperands`].
//!
//! The standard registry ([`Dispatcher::builtin`]) is built once per process
//! behind a `LazyLock` and never mutated afterwards, so concurrent readers need
//! no synchronization. Hosts that want extra cells build their own
//! [`Dispatcher`] and register into it.

mod builtin;
pub mod compare;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use tracing::debug;

use crate::error::{Result, VarError};
use crate::policy::Policy;
use crate::tag::{Tag, TAG_COUNT};
use crate::value::Value;

/// Number of binary operators.
pub const OP_COUNT: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    FloorDiv = 4,
    Mod = 5,
    Eq = 6,
    Ne = 7,
    Lt = 8,
    Le = 9,
    Gt = 10,
    Ge = 11,
    And = 12,
    Or = 13,
    Xor = 14,
    BitAnd = 15,
    BitOr = 16,
    BitXor = 17,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; OP_COUNT] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::FloorDiv,
        BinaryOp::Mod,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn from_code(code: u8) -> BinaryOp {
        BinaryOp::ALL[code as usize % OP_COUNT]
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::BitAnd => "bitand",
            BinaryOp::BitOr => "bitor",
            BinaryOp::BitXor => "bitxor",
        }
    }

    pub const fn is_arithmetic(self) -> bool {
        (self as u8) <= BinaryOp::Mod as u8
    }

    pub const fn is_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    /// `&`, `|` and `^`: bitwise on integers, algebra on sets and maps.
    pub const fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinaryOp {
    type Err = VarError;

    /// Accepts both the operator name (`add`) and its symbol (`+`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BinaryOp::ALL
            .into_iter()
            .find(|op| op.name() == wanted || op.symbol() == wanted)
            .ok_or_else(|| VarError::InvalidValue(format!("unknown operator '{s}'")))
    }
}

/// A dispatch cell.
pub type BinaryFn = fn(&Value, &Value, Policy) -> Result<Value>;

fn unsupported<const OP: u8>(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Err(VarError::UnsupportedOperands {
        op: BinaryOp::from_code(OP),
        left: a.tag(),
        right: b.tag(),
    })
}

const SENTINELS: [BinaryFn; OP_COUNT] = [
    unsupported::<0>,
    unsupported::<1>,
    unsupported::<2>,
    unsupported::<3>,
    unsupported::<4>,
    unsupported::<5>,
    unsupported::<6>,
    unsupported::<7>,
    unsupported::<8>,
    unsupported::<9>,
    unsupported::<10>,
    unsupported::<11>,
    unsupported::<12>,
    unsupported::<13>,
    unsupported::<14>,
    unsupported::<15>,
    unsupported::<16>,
    unsupported::<17>,
];

// ============================================================================
// DispatchTable
// ============================================================================

/// Function-pointer table for one operator.
#[derive(Clone)]
pub struct DispatchTable {
    op: BinaryOp,
    cells: [[BinaryFn; TAG_COUNT]; TAG_COUNT],
    supported: [[bool; TAG_COUNT]; TAG_COUNT],
}

impl DispatchTable {
    /// A table where every cell is the operator's sentinel.
    pub fn new(op: BinaryOp) -> Self {
        DispatchTable {
            op,
            cells: [[SENTINELS[op.index()]; TAG_COUNT]; TAG_COUNT],
            supported: [[false; TAG_COUNT]; TAG_COUNT],
        }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    /// Install `f` for `(left, right)`. No other cell changes.
    pub fn register(&mut self, left: Tag, right: Tag, f: BinaryFn) -> &mut Self {
        self.cells[left.index()][right.index()] = f;
        self.supported[left.index()][right.index()] = true;
        self
    }

    /// Restore the sentinel for `(left, right)`.
    pub fn unregister(&mut self, left: Tag, right: Tag) -> &mut Self {
        self.cells[left.index()][right.index()] = SENTINELS[self.op.index()];
        self.supported[left.index()][right.index()] = false;
        self
    }

    #[inline]
    pub fn lookup(&self, left: Tag, right: Tag) -> BinaryFn {
        self.cells[left.index()][right.index()]
    }

    pub fn is_supported(&self, left: Tag, right: Tag) -> bool {
        self.supported[left.index()][right.index()]
    }

    /// Number of registered cells.
    pub fn supported_count(&self) -> usize {
        self.supported.iter().flatten().filter(|&&s| s).count()
    }

    #[inline]
    pub fn call(&self, a: &Value, b: &Value, policy: Policy) -> Result<Value> {
        (self.cells[a.tag().index()][b.tag().index()])(a, b, policy)
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("op", &self.op)
            .field("supported", &self.supported_count())
            .finish()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// One [`DispatchTable`] per [`BinaryOp`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tables: [DispatchTable; OP_COUNT],
}

static GLOBAL: LazyLock<Dispatcher> = LazyLock::new(Dispatcher::builtin);

impl Dispatcher {
    /// Every cell unsupported.
    pub fn empty() -> Self {
        Dispatcher {
            tables: BinaryOp::ALL.map(DispatchTable::new),
        }
    }

    /// The standard registry: arithmetic, bitwise, text, sequence, set/map,
    /// comparison and logical cells.
    pub fn builtin() -> Self {
        let mut dispatcher = Self::empty();
        builtin::register_all(&mut dispatcher);
        debug!(
            cells = dispatcher.tables.iter().map(DispatchTable::supported_count).sum::<usize>(),
            "built dispatch registry"
        );
        dispatcher
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Dispatcher {
        &GLOBAL
    }

    pub fn table(&self, op: BinaryOp) -> &DispatchTable {
        &self.tables[op.index()]
    }

    pub fn table_mut(&mut self, op: BinaryOp) -> &mut DispatchTable {
        &mut self.tables[op.index()]
    }

    pub fn register(&mut self, op: BinaryOp, left: Tag, right: Tag, f: BinaryFn) -> &mut Self {
        self.tables[op.index()].register(left, right, f);
        self
    }

    pub fn supports(&self, op: BinaryOp, left: Tag, right: Tag) -> bool {
        self.tables[op.index()].is_supported(left, right)
    }

    #[inline]
    pub fn apply(&self, op: BinaryOp, a: &Value, b: &Value, policy: Policy) -> Result<Value> {
        self.tables[op.index()].call(a, b, policy)
    }
}

/// Apply `op` through the global registry.
#[inline]
pub fn dispatch(op: BinaryOp, a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    GLOBAL.apply(op, a, b, policy)
}
