//! Named operator functions and the `std::ops` impls on [`Value`].
//!
//! There are two entry points with different overflow defaults:
//!
//! - the named functions (`ops::add(&a, &b)`) use [`Policy::NAMED_DEFAULT`]
//!   (Throw); their `*_with` forms take the policy explicitly;
//! - infix syntax (`&a + &b`) uses [`Policy::OPERATOR_DEFAULT`] (RawNoCheck),
//!   so `+` on two `I32` costs what `+` on two `i32` costs.
//!
//! ```
//! use dynvar_core::{ops, Policy, Value};
//!
//! let a = Value::from(i32::MAX);
//! let b = Value::from(1);
//! assert!(ops::add(&a, &b).is_err());
//! assert_eq!(ops::add_with(&a, &b, Policy::Promote).unwrap(), Value::I64(1 << 31));
//! ```

use std::ops;

use crate::arith;
use crate::dispatch::{dispatch, BinaryOp};
use crate::error::Result;
use crate::policy::Policy;
use crate::value::Value;

macro_rules! named_binary {
    ($($name:ident, $with:ident => $op:ident;)*) => {
        $(
            pub fn $name(a: &Value, b: &Value) -> Result<Value> {
                dispatch(BinaryOp::$op, a, b, Policy::NAMED_DEFAULT)
            }

            pub fn $with(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
                dispatch(BinaryOp::$op, a, b, policy)
            }
        )*
    };
}

named_binary! {
    add, add_with => Add;
    sub, sub_with => Sub;
    mul, mul_with => Mul;
    div, div_with => Div;
    floor_div, floor_div_with => FloorDiv;
    modulo, modulo_with => Mod;
}

pub fn pow(base: &Value, exp: &Value) -> Result<Value> {
    arith::pow(base, exp, Policy::NAMED_DEFAULT)
}

pub fn pow_with(base: &Value, exp: &Value, policy: Policy) -> Result<Value> {
    arith::pow(base, exp, policy)
}

pub fn neg(a: &Value) -> Result<Value> {
    arith::neg(a, Policy::NAMED_DEFAULT)
}

pub fn neg_with(a: &Value, policy: Policy) -> Result<Value> {
    arith::neg(a, policy)
}

pub fn factorial(n: &Value) -> Result<Value> {
    arith::factorial(n, Policy::NAMED_DEFAULT)
}

pub fn factorial_with(n: &Value, policy: Policy) -> Result<Value> {
    arith::factorial(n, policy)
}

pub fn gcd(a: &Value, b: &Value) -> Result<Value> {
    arith::gcd(a, b, Policy::NAMED_DEFAULT)
}

pub fn gcd_with(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    arith::gcd(a, b, policy)
}

pub fn lcm(a: &Value, b: &Value) -> Result<Value> {
    arith::lcm(a, b, Policy::NAMED_DEFAULT)
}

pub fn lcm_with(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    arith::lcm(a, b, policy)
}

macro_rules! named_predicate {
    ($($name:ident => $op:ident;)*) => {
        $(
            pub fn $name(a: &Value, b: &Value) -> Result<Value> {
                dispatch(BinaryOp::$op, a, b, Policy::NAMED_DEFAULT)
            }
        )*
    };
}

named_predicate! {
    eq => Eq;
    ne => Ne;
    lt => Lt;
    le => Le;
    gt => Gt;
    ge => Ge;
    and => And;
    or => Or;
    xor => Xor;
    bit_and => BitAnd;
    bit_or => BitOr;
    bit_xor => BitXor;
}

/// Bitwise complement of an integer.
pub fn invert(a: &Value) -> Result<Value> {
    arith::invert(a)
}

// ============================================================================
// std::ops
// ============================================================================

macro_rules! infix {
    ($($trait:ident, $method:ident => $op:ident;)*) => {
        $(
            impl ops::$trait<&Value> for &Value {
                type Output = Result<Value>;

                #[inline]
                fn $method(self, rhs: &Value) -> Result<Value> {
                    dispatch(BinaryOp::$op, self, rhs, Policy::OPERATOR_DEFAULT)
                }
            }

            impl ops::$trait for Value {
                type Output = Result<Value>;

                #[inline]
                fn $method(self, rhs: Value) -> Result<Value> {
                    dispatch(BinaryOp::$op, &self, &rhs, Policy::OPERATOR_DEFAULT)
                }
            }
        )*
    };
}

infix! {
    Add, add => Add;
    Sub, sub => Sub;
    Mul, mul => Mul;
    Div, div => Div;
    Rem, rem => Mod;
    BitAnd, bitand => BitAnd;
    BitOr, bitor => BitOr;
    BitXor, bitxor => BitXor;
}

impl ops::Neg for &Value {
    type Output = Result<Value>;

    fn neg(self) -> Result<Value> {
        arith::neg(self, Policy::OPERATOR_DEFAULT)
    }
}

impl ops::Neg for Value {
    type Output = Result<Value>;

    fn neg(self) -> Result<Value> {
        arith::neg(&self, Policy::OPERATOR_DEFAULT)
    }
}

/// Logical not of the truthiness.
impl ops::Not for &Value {
    type Output = Value;

    fn not(self) -> Value {
        Value::Bool(!self.truthy())
    }
}

impl ops::Not for Value {
    type Output = Value;

    fn not(self) -> Value {
        Value::Bool(!self.truthy())
    }
}

// ============================================================================
// Value conveniences
// ============================================================================

impl Value {
    /// The `==` operator as a plain `bool`. Unlike `PartialEq`, NaN is
    /// unequal to itself.
    pub fn equals(&self, other: &Value) -> bool {
        crate::dispatch::compare::equals(self, other)
    }

    /// Three-way comparison by the ordering operators.
    ///
    /// `Ok(None)` when the pair is unordered (NaN, incomparable sets);
    /// `TypeMismatch` when the kinds have no ordering at all.
    pub fn try_cmp(&self, other: &Value) -> Result<Option<std::cmp::Ordering>> {
        crate::dispatch::compare::ordering(self, other)
    }

    /// Apply any binary operator through the global registry.
    pub fn apply(&self, op: BinaryOp, other: &Value, policy: Policy) -> Result<Value> {
        dispatch(op, self, other, policy)
    }
}
