//! The standard registry and the non-numeric cells it installs.

use crate::arith::{bitwise_cell, numeric_cell, same_width_cell, ArithOp, NativeInt};
use crate::dispatch::compare::{eq_cell, ne_cell, order_cell};
use crate::dispatch::{BinaryOp, Dispatcher};
use crate::error::{Result, VarError};
use crate::heap::{Dict, List, OrderedDict, OrderedSet, Set};
use crate::policy::Policy;
use crate::promotion::Num;
use crate::tag::Tag;
use crate::value::Value;

pub(crate) fn register_all(d: &mut Dispatcher) {
    register_arithmetic(d);
    register_bitwise(d);
    register_text(d);
    register_sequences(d);
    register_set_like(d);
    register_comparisons(d);
    register_logical(d);
}

const ADD: u8 = ArithOp::Add as u8;
const SUB: u8 = ArithOp::Sub as u8;
const MUL: u8 = ArithOp::Mul as u8;
const DIV: u8 = ArithOp::Div as u8;
const FLOOR_DIV: u8 = ArithOp::FloorDiv as u8;
const MOD: u8 = ArithOp::Mod as u8;

fn register_arithmetic(d: &mut Dispatcher) {
    for left in Tag::NUMERIC {
        for right in Tag::NUMERIC {
            d.register(BinaryOp::Add, left, right, numeric_cell::<ADD>)
                .register(BinaryOp::Sub, left, right, numeric_cell::<SUB>)
                .register(BinaryOp::Mul, left, right, numeric_cell::<MUL>)
                .register(BinaryOp::Div, left, right, numeric_cell::<DIV>)
                .register(BinaryOp::FloorDiv, left, right, numeric_cell::<FLOOR_DIV>)
                .register(BinaryOp::Mod, left, right, numeric_cell::<MOD>);
        }
    }
    register_same_width::<u32>(d);
    register_same_width::<u64>(d);
    register_same_width::<u128>(d);
    register_same_width::<i32>(d);
    register_same_width::<i64>(d);
    register_same_width::<i128>(d);
}

// True division always leaves the integer domain, so it keeps the general cell.
fn register_same_width<T: NativeInt>(d: &mut Dispatcher) {
    let tag = T::TAG;
    d.register(BinaryOp::Add, tag, tag, same_width_cell::<T, ADD>)
        .register(BinaryOp::Sub, tag, tag, same_width_cell::<T, SUB>)
        .register(BinaryOp::Mul, tag, tag, same_width_cell::<T, MUL>)
        .register(BinaryOp::FloorDiv, tag, tag, same_width_cell::<T, FLOOR_DIV>)
        .register(BinaryOp::Mod, tag, tag, same_width_cell::<T, MOD>);
}

const BIT_AND: u8 = BinaryOp::BitAnd as u8;
const BIT_OR: u8 = BinaryOp::BitOr as u8;
const BIT_XOR: u8 = BinaryOp::BitXor as u8;

// Floats have no bitwise cells.
fn register_bitwise(d: &mut Dispatcher) {
    let integers = || Tag::NUMERIC.into_iter().filter(|t| t.is_integer());
    for left in integers() {
        for right in integers() {
            d.register(BinaryOp::BitAnd, left, right, bitwise_cell::<BIT_AND>)
                .register(BinaryOp::BitOr, left, right, bitwise_cell::<BIT_OR>)
                .register(BinaryOp::BitXor, left, right, bitwise_cell::<BIT_XOR>);
        }
    }
}

// ============================================================================
// Text
// ============================================================================

fn register_text(d: &mut Dispatcher) {
    d.register(BinaryOp::Add, Tag::Str, Tag::Str, concat_text);
    for num in Tag::NUMERIC {
        d.register(BinaryOp::Add, Tag::Str, num, concat_text)
            .register(BinaryOp::Add, num, Tag::Str, concat_text);
    }
    for int in Tag::NUMERIC.into_iter().filter(|t| t.is_integer()) {
        d.register(BinaryOp::Mul, Tag::Str, int, repeat_text)
            .register(BinaryOp::Mul, int, Tag::Str, repeat_text);
    }
}

/// Concatenate the display forms; numbers contribute their text.
fn concat_text(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::text(format!("{a}{b}")))
}

/// Repetition count from an integer operand; non-positive counts give zero.
fn repeat_count(count: &Value) -> Result<usize> {
    match Num::of(count) {
        Some(Num::Int(n)) if n <= 0 => Ok(0),
        Some(Num::Int(n)) => usize::try_from(n)
            .map_err(|_| VarError::overflow(format!("repeat count {n} is too large"))),
        Some(Num::Huge(n)) => Err(VarError::overflow(format!("repeat count {n} is too large"))),
        _ => Err(VarError::mismatch("integer", count.tag())),
    }
}

/// Largest result, in bytes, that repetition will build.
pub(crate) const MAX_REPEAT_BYTES: usize = 1 << 30;

/// Refuse repetition results past [`MAX_REPEAT_BYTES`] before allocating.
fn check_repeat_size(unit_bytes: usize, count: usize) -> Result<()> {
    match unit_bytes.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_BYTES => Ok(()),
        _ => Err(VarError::overflow(format!(
            "repeated result of {unit_bytes} bytes x {count} exceeds {MAX_REPEAT_BYTES} bytes"
        ))),
    }
}

fn repeat_text(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (text, count) = match (a, b) {
        (Value::Str(t), n) | (n, Value::Str(t)) => (t.as_str(), repeat_count(n)?),
        _ => return Err(VarError::mismatch("str", a.tag())),
    };
    if text.is_empty() || count == 0 {
        return Ok(Value::text(""));
    }
    check_repeat_size(text.len(), count)?;
    Ok(Value::text(text.repeat(count)))
}

// ============================================================================
// Sequences
// ============================================================================

fn register_sequences(d: &mut Dispatcher) {
    d.register(BinaryOp::Add, Tag::List, Tag::List, concat_list)
        .register(BinaryOp::Sub, Tag::List, Tag::List, list_difference)
        .register(BinaryOp::BitAnd, Tag::List, Tag::List, list_intersection)
        .register(BinaryOp::BitOr, Tag::List, Tag::List, concat_list)
        .register(BinaryOp::BitXor, Tag::List, Tag::List, list_symmetric_difference);
    for int in Tag::NUMERIC.into_iter().filter(|t| t.is_integer()) {
        d.register(BinaryOp::Mul, Tag::List, int, repeat_list)
            .register(BinaryOp::Mul, int, Tag::List, repeat_list);
    }
}

fn concat_list(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (x, y) = (a.as_list()?, b.as_list()?);
    Ok(Value::list(x.iter().chain(y.iter()).cloned()))
}

/// Every element of the left list that does not occur in the right one.
fn list_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (x, y) = (a.as_list()?, b.as_list()?);
    Ok(Value::list(x.iter().filter(|v| !y.contains(v)).cloned()))
}

/// Elements of the left list that occur in the right one, in left order.
fn list_intersection(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (x, y) = (a.as_list()?, b.as_list()?);
    Ok(Value::list(x.iter().filter(|v| y.contains(v)).cloned()))
}

/// Left elements absent from the right, then right elements absent from the
/// left. Duplicates on either side are kept.
fn list_symmetric_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (x, y) = (a.as_list()?, b.as_list()?);
    let only_left = x.iter().filter(|v| !y.contains(v));
    let only_right = y.iter().filter(|v| !x.contains(v));
    Ok(Value::list(only_left.chain(only_right).cloned()))
}

fn repeat_list(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let (list, count): (&List, usize) = match (a, b) {
        (Value::List(l), n) | (n, Value::List(l)) => (&**l, repeat_count(n)?),
        _ => return Err(VarError::mismatch("list", a.tag())),
    };
    if list.is_empty() || count == 0 {
        return Ok(Value::list(Vec::new()));
    }
    check_repeat_size(list.len() * std::mem::size_of::<Value>(), count)?;
    let mut items = Vec::with_capacity(list.len() * count);
    for _ in 0..count {
        items.extend(list.iter().cloned());
    }
    Ok(Value::from(items))
}

// ============================================================================
// Sets and maps
// ============================================================================

fn register_set_like(d: &mut Dispatcher) {
    use Tag::{Dict as D, OrderedDict as OD, OrderedSet as OS, Set as S};
    d.register(BinaryOp::Sub, S, S, set_difference)
        .register(BinaryOp::BitAnd, S, S, set_intersection)
        .register(BinaryOp::BitOr, S, S, set_union)
        .register(BinaryOp::BitXor, S, S, set_symmetric_difference)
        .register(BinaryOp::Sub, OS, OS, ordered_set_difference)
        .register(BinaryOp::BitAnd, OS, OS, ordered_set_intersection)
        .register(BinaryOp::BitOr, OS, OS, ordered_set_union)
        .register(BinaryOp::BitXor, OS, OS, ordered_set_symmetric_difference)
        .register(BinaryOp::Sub, D, D, dict_difference)
        .register(BinaryOp::BitAnd, D, D, dict_intersection)
        .register(BinaryOp::BitOr, D, D, dict_merge)
        .register(BinaryOp::Sub, OD, OD, ordered_dict_difference)
        .register(BinaryOp::BitAnd, OD, OD, ordered_dict_intersection)
        .register(BinaryOp::BitOr, OD, OD, ordered_dict_merge);
}

fn set_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let diff: Set = a.as_set()?.difference(b.as_set()?);
    Ok(Value::from(diff))
}

fn set_intersection(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_set()?.intersection(b.as_set()?)))
}

fn set_union(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_set()?.union(b.as_set()?)))
}

fn set_symmetric_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_set()?.symmetric_difference(b.as_set()?)))
}

fn ordered_set_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let diff: OrderedSet = a.as_ordered_set()?.difference(b.as_ordered_set()?);
    Ok(Value::from(diff))
}

fn ordered_set_intersection(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_ordered_set()?.intersection(b.as_ordered_set()?)))
}

fn ordered_set_union(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_ordered_set()?.union(b.as_ordered_set()?)))
}

fn ordered_set_symmetric_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let diff = a.as_ordered_set()?.symmetric_difference(b.as_ordered_set()?);
    Ok(Value::from(diff))
}

fn dict_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let diff: Dict = a.as_dict()?.key_difference(b.as_dict()?);
    Ok(Value::from(diff))
}

fn dict_intersection(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_dict()?.key_intersection(b.as_dict()?)))
}

/// Right-hand values win on shared keys.
fn dict_merge(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_dict()?.merged(b.as_dict()?)))
}

fn ordered_dict_difference(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let diff: OrderedDict = a.as_ordered_dict()?.key_difference(b.as_ordered_dict()?);
    Ok(Value::from(diff))
}

fn ordered_dict_intersection(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    let common = a.as_ordered_dict()?.key_intersection(b.as_ordered_dict()?);
    Ok(Value::from(common))
}

fn ordered_dict_merge(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::from(a.as_ordered_dict()?.merged(b.as_ordered_dict()?)))
}

// ============================================================================
// Comparison and logic
// ============================================================================

/// Kinds that carry an ordering among themselves.
const ORDERED_KINDS: [Tag; 5] = [
    Tag::Str,
    Tag::List,
    Tag::Set,
    Tag::OrderedSet,
    Tag::OrderedDict,
];

fn register_comparisons(d: &mut Dispatcher) {
    for left in Tag::ALL {
        for right in Tag::ALL {
            d.register(BinaryOp::Eq, left, right, eq_cell)
                .register(BinaryOp::Ne, left, right, ne_cell);
        }
    }

    let numeric_pairs = Tag::NUMERIC
        .into_iter()
        .flat_map(|l| Tag::NUMERIC.into_iter().map(move |r| (l, r)));
    let kind_pairs = ORDERED_KINDS.into_iter().map(|t| (t, t));
    for (left, right) in numeric_pairs.chain(kind_pairs) {
        d.register(BinaryOp::Lt, left, right, order_cell::<{ BinaryOp::Lt as u8 }>)
            .register(BinaryOp::Le, left, right, order_cell::<{ BinaryOp::Le as u8 }>)
            .register(BinaryOp::Gt, left, right, order_cell::<{ BinaryOp::Gt as u8 }>)
            .register(BinaryOp::Ge, left, right, order_cell::<{ BinaryOp::Ge as u8 }>);
    }
}

fn and_cell(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::Bool(a.truthy() && b.truthy()))
}

fn or_cell(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::Bool(a.truthy() || b.truthy()))
}

fn xor_cell(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    Ok(Value::Bool(a.truthy() != b.truthy()))
}

fn register_logical(d: &mut Dispatcher) {
    for left in Tag::ALL {
        for right in Tag::ALL {
            d.register(BinaryOp::And, left, right, and_cell)
                .register(BinaryOp::Or, left, right, or_cell)
                .register(BinaryOp::Xor, left, right, xor_cell);
        }
    }
}
