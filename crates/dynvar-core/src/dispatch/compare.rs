//! Equality and ordering as seen by the comparison operators.
//!
//! These follow operator semantics, not key semantics: NaN is unequal to
//! everything, sequences compare element by element, and sets order by
//! inclusion.

use std::cmp::Ordering;

use crate::dispatch::BinaryOp;
use crate::error::{Result, VarError};
use crate::policy::Policy;
use crate::promotion::Num;
use crate::value::Value;

/// The `==` operator. Defined for every pair; different non-numeric kinds
/// are never equal.
pub fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(x), Value::List(y)) => seq_equals(x.iter(), y.iter(), x.len(), y.len()),
        (Value::OrderedSet(x), Value::OrderedSet(y)) => {
            seq_equals(x.iter(), y.iter(), x.len(), y.len())
        }
        (Value::Set(x), Value::Set(y)) => x.len() == y.len() && x.iter().all(|v| y.contains(v)),
        (Value::Dict(x), Value::Dict(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| equals(v, other)))
        }
        (Value::OrderedDict(x), Value::OrderedDict(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((k1, v1), (k2, v2))| equals(k1, k2) && equals(v1, v2))
        }
        (Value::Graph(x), Value::Graph(y)) => x == y,
        _ => match (Num::of(a), Num::of(b)) {
            (Some(x), Some(y)) => x.compare(y) == Some(Ordering::Equal),
            _ => false,
        },
    }
}

fn seq_equals<'a>(
    xs: impl Iterator<Item = &'a Value>,
    ys: impl Iterator<Item = &'a Value>,
    x_len: usize,
    y_len: usize,
) -> bool {
    x_len == y_len && xs.zip(ys).all(|(x, y)| equals(x, y))
}

fn holds(op: BinaryOp, ordering: Option<Ordering>) -> bool {
    match (op, ordering) {
        (BinaryOp::Lt, Some(o)) => o.is_lt(),
        (BinaryOp::Le, Some(o)) => o.is_le(),
        (BinaryOp::Gt, Some(o)) => o.is_gt(),
        (BinaryOp::Ge, Some(o)) => o.is_ge(),
        _ => false,
    }
}

/// Evaluate one of `<`, `<=`, `>`, `>=`.
///
/// Sequences compare lexicographically: the first pair of unequal elements
/// decides, otherwise the shorter sequence is smaller. Sets compare by
/// inclusion, so two sets may be neither smaller nor larger than each other.
pub fn relate(op: BinaryOp, a: &Value, b: &Value) -> Result<bool> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(holds(op, Some(x.as_str().cmp(y.as_str())))),
        (Value::List(x), Value::List(y)) => seq_relate(op, x.iter(), y.iter(), x.len(), y.len()),
        (Value::OrderedSet(x), Value::OrderedSet(y)) => {
            seq_relate(op, x.iter(), y.iter(), x.len(), y.len())
        }
        (Value::OrderedDict(x), Value::OrderedDict(y)) => {
            for ((k1, v1), (k2, v2)) in x.iter().zip(y.iter()) {
                if !equals(k1, k2) {
                    return relate(op, k1, k2);
                }
                if !equals(v1, v2) {
                    return relate(op, v1, v2);
                }
            }
            Ok(holds(op, Some(x.len().cmp(&y.len()))))
        }
        (Value::Set(x), Value::Set(y)) => Ok(match op {
            BinaryOp::Lt => x.len() < y.len() && x.is_subset(y),
            BinaryOp::Le => x.is_subset(y),
            BinaryOp::Gt => y.len() < x.len() && y.is_subset(x),
            BinaryOp::Ge => y.is_subset(x),
            _ => false,
        }),
        _ => match (Num::of(a), Num::of(b)) {
            (Some(x), Some(y)) => Ok(holds(op, x.compare(y))),
            _ => Err(VarError::UnsupportedOperands {
                op,
                left: a.tag(),
                right: b.tag(),
            }),
        },
    }
}

fn seq_relate<'a>(
    op: BinaryOp,
    xs: impl Iterator<Item = &'a Value>,
    ys: impl Iterator<Item = &'a Value>,
    x_len: usize,
    y_len: usize,
) -> Result<bool> {
    for (x, y) in xs.zip(ys) {
        if !equals(x, y) {
            return relate(op, x, y);
        }
    }
    Ok(holds(op, Some(x_len.cmp(&y_len))))
}

/// Three-way comparison built from the operators. `Ok(None)` for unordered
/// pairs such as NaN or incomparable sets; `Err` for kinds with no ordering.
pub fn ordering(a: &Value, b: &Value) -> Result<Option<Ordering>> {
    // `relate` goes first: it is what rejects kinds with no ordering, even
    // when the two operands are equal.
    if relate(BinaryOp::Lt, a, b)? {
        return Ok(Some(Ordering::Less));
    }
    if relate(BinaryOp::Gt, a, b)? {
        return Ok(Some(Ordering::Greater));
    }
    Ok(equals(a, b).then_some(Ordering::Equal))
}

pub(crate) fn eq_cell(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::Bool(equals(a, b)))
}

pub(crate) fn ne_cell(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::Bool(!equals(a, b)))
}

pub(crate) fn order_cell<const OP: u8>(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    relate(BinaryOp::from_code(OP), a, b).map(Value::Bool)
}
