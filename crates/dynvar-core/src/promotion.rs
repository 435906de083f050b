//! Type promotion: exact numeric scratch values, native result widths and the
//! promotion ladders.
//!
//! Integer arithmetic is first carried out exactly ([`Exact`]: `i128` with a
//! `BigInt` fallback) and then *settled* into a tag according to the overflow
//! policy:
//!
//! - [`fit`] places the exact result into one given tag, or fails;
//! - [`promote_integer`] walks the ladder to the narrowest tag that holds it;
//! - [`wrap`] truncates it to a tag's width, two's complement.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};
use tracing::trace;

use crate::error::{Result, VarError};
use crate::tag::Tag;
use crate::value::Value;

const TWO_127: f64 = i128::MAX as f64;
const TWO_128: f64 = u128::MAX as f64;

// ============================================================================
// Num: width-independent view of a numeric value
// ============================================================================

/// The mathematical value of a numeric [`Value`], independent of its width.
///
/// `Huge` holds only `u128` values above `i128::MAX`, so every integer has
/// exactly one representation.
#[derive(Debug, Clone, Copy)]
pub enum Num {
    Int(i128),
    Huge(u128),
    Float(f64),
}

impl Num {
    /// `None` for non-numeric values. `Bool` reads as 0/1.
    pub fn of(value: &Value) -> Option<Num> {
        let num = match *value {
            Value::Bool(b) => Num::Int(i128::from(b)),
            Value::U32(v) => Num::Int(i128::from(v)),
            Value::U64(v) => Num::Int(i128::from(v)),
            Value::U128(v) => match i128::try_from(v) {
                Ok(i) => Num::Int(i),
                Err(_) => Num::Huge(v),
            },
            Value::I32(v) => Num::Int(i128::from(v)),
            Value::I64(v) => Num::Int(i128::from(v)),
            Value::I128(v) => Num::Int(v),
            Value::F32(v) => Num::Float(f64::from(v)),
            Value::F64(v) => Num::Float(v),
            _ => return None,
        };
        Some(num)
    }

    pub fn is_zero(self) -> bool {
        match self {
            Num::Int(i) => i == 0,
            Num::Huge(_) => false,
            Num::Float(f) => f == 0.0,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Num::Int(i) => i < 0,
            Num::Huge(_) => false,
            Num::Float(f) => f < 0.0,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Huge(u) => u as f64,
            Num::Float(f) => f,
        }
    }

    /// Exact integer value. Floats truncate toward zero.
    pub fn to_exact(self) -> Exact {
        match self {
            Num::Int(i) => Exact::Small(i),
            Num::Huge(u) => Exact::Big(BigInt::from(u)),
            Num::Float(f) => Exact::Small(f as i128),
        }
    }

    /// Two's-complement bit pattern, the input of an `as` cast.
    pub(crate) fn bits(self) -> i128 {
        match self {
            Num::Int(i) => i,
            Num::Huge(u) => u as i128,
            Num::Float(f) => f as i128,
        }
    }

    /// Exact mathematical comparison across integers and floats. `None` when
    /// a NaN is involved.
    pub fn compare(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Huge(a), Num::Huge(b)) => Some(a.cmp(&b)),
            (Num::Int(_), Num::Huge(_)) => Some(Ordering::Less),
            (Num::Huge(_), Num::Int(_)) => Some(Ordering::Greater),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
            (Num::Int(a), Num::Float(b)) => cmp_int_float(a, b),
            (Num::Float(a), Num::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
            (Num::Huge(a), Num::Float(b)) => cmp_huge_float(a, b),
            (Num::Float(a), Num::Huge(b)) => cmp_huge_float(b, a).map(Ordering::reverse),
        }
    }

    /// Key equality: mathematical equality, except that NaN equals NaN.
    pub(crate) fn key_eq(self, other: Num) -> bool {
        match (self, other) {
            (Num::Float(a), Num::Float(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    /// Hash consistent with [`key_eq`](Self::key_eq): integral floats hash as
    /// the integer they equal.
    pub(crate) fn hash_key<H: Hasher>(self, state: &mut H) {
        match self.canonical() {
            Num::Int(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Num::Huge(u) => {
                1u8.hash(state);
                u.hash(state);
            }
            Num::Float(f) => {
                2u8.hash(state);
                if f.is_nan() {
                    u64::MAX.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
        }
    }

    fn canonical(self) -> Num {
        match self {
            Num::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                if (-TWO_127..TWO_127).contains(&f) {
                    Num::Int(f as i128)
                } else if (0.0..TWO_128).contains(&f) {
                    Num::Huge(f as u128)
                } else {
                    self
                }
            }
            other => other,
        }
    }
}

fn cmp_int_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= TWO_127 {
        return Some(Ordering::Less);
    }
    if f < -TWO_127 {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

// `u` is always above i128::MAX.
fn cmp_huge_float(u: u128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= TWO_128 {
        return Some(Ordering::Less);
    }
    if f < TWO_127 {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    match u.cmp(&(floor as u128)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

// ============================================================================
// Exact integer scratch
// ============================================================================

/// Mathematically exact integer. Stays in `i128` until an operation would
/// overflow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exact {
    Small(i128),
    Big(BigInt),
}

impl Exact {
    pub fn to_bigint(&self) -> BigInt {
        match self {
            Exact::Small(i) => BigInt::from(*i),
            Exact::Big(b) => b.clone(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Exact::Small(i) => *i < 0,
            Exact::Big(b) => b.is_negative(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Exact::Small(i) => *i == 0,
            Exact::Big(b) => b.is_zero(),
        }
    }

    pub fn is_even(&self) -> bool {
        self.low_bits() & 1 == 0
    }

    fn combine(
        &self,
        other: &Exact,
        small: fn(i128, i128) -> Option<i128>,
        big: fn(BigInt, BigInt) -> BigInt,
    ) -> Exact {
        if let (Exact::Small(a), Exact::Small(b)) = (self, other) {
            if let Some(r) = small(*a, *b) {
                return Exact::Small(r);
            }
        }
        Exact::from(big(self.to_bigint(), other.to_bigint()))
    }

    pub fn add(&self, other: &Exact) -> Exact {
        self.combine(other, i128::checked_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Exact) -> Exact {
        self.combine(other, i128::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Exact) -> Exact {
        self.combine(other, i128::checked_mul, |a, b| a * b)
    }

    /// Quotient rounded toward negative infinity. `other` must be non-zero.
    pub fn div_floor(&self, other: &Exact) -> Exact {
        self.combine(
            other,
            |a, b| a.checked_div(b).map(|_| Integer::div_floor(&a, &b)),
            |a, b| Integer::div_floor(&a, &b),
        )
    }

    /// Truncating remainder (sign of the dividend). `other` must be non-zero.
    pub fn rem(&self, other: &Exact) -> Exact {
        self.combine(other, i128::checked_rem, |a, b| a % b)
    }

    pub fn neg(&self) -> Exact {
        match self {
            Exact::Small(i) => match i.checked_neg() {
                Some(n) => Exact::Small(n),
                None => Exact::Big(-BigInt::from(*i)),
            },
            Exact::Big(b) => Exact::from(-b),
        }
    }

    /// Nearest `f64`; out-of-range values become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Exact::Small(i) => *i as f64,
            Exact::Big(b) => b.to_f64().unwrap_or(if b.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
        }
    }

    /// Low 128 bits of the two's-complement representation.
    pub fn low_bits(&self) -> u128 {
        match self {
            Exact::Small(i) => *i as u128,
            Exact::Big(b) => {
                let masked = b & BigInt::from(u128::MAX);
                masked.to_u128().unwrap_or(0)
            }
        }
    }
}

impl From<i128> for Exact {
    fn from(i: i128) -> Self {
        Exact::Small(i)
    }
}

impl From<BigInt> for Exact {
    fn from(big: BigInt) -> Self {
        match big.to_i128() {
            Some(i) => Exact::Small(i),
            None => Exact::Big(big),
        }
    }
}

impl ToPrimitive for Exact {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Exact::Small(i) => i.to_i64(),
            Exact::Big(b) => b.to_i64(),
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Exact::Small(i) => i.to_u64(),
            Exact::Big(b) => b.to_u64(),
        }
    }

    fn to_i128(&self) -> Option<i128> {
        match self {
            Exact::Small(i) => Some(*i),
            Exact::Big(b) => b.to_i128(),
        }
    }

    fn to_u128(&self) -> Option<u128> {
        match self {
            Exact::Small(i) => i.to_u128(),
            Exact::Big(b) => b.to_u128(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(Exact::to_f64(self))
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exact::Small(i) => write!(f, "{i}"),
            Exact::Big(b) => write!(f, "{b}"),
        }
    }
}

// ============================================================================
// Native width
// ============================================================================

/// The tag a numeric pair computes in when no promotion happens.
///
/// Any float operand selects the widest float present. Otherwise the wider
/// integer width, signed if either side is signed. `Bool` has no width of its
/// own, so `Bool ⊕ Bool` lands on `I32`.
pub fn native_target(left: Tag, right: Tag) -> Tag {
    if left.is_float() || right.is_float() {
        return if left == Tag::F64 || right == Tag::F64 {
            Tag::F64
        } else {
            Tag::F32
        };
    }
    let width = left
        .bit_width()
        .unwrap_or(0)
        .max(right.bit_width().unwrap_or(0));
    let signed = left.is_signed() || right.is_signed();
    match (width, signed) {
        (0, _) => Tag::I32,
        (32, false) => Tag::U32,
        (64, false) => Tag::U64,
        (128, false) => Tag::U128,
        (32, true) => Tag::I32,
        (64, true) => Tag::I64,
        _ => Tag::I128,
    }
}

// ============================================================================
// Settling
// ============================================================================

/// Place `exact` into the integer tag `target`, if it fits.
pub fn fit(exact: &Exact, target: Tag) -> Option<Value> {
    match target {
        Tag::U32 => exact.to_u32().map(Value::U32),
        Tag::U64 => exact.to_u64().map(Value::U64),
        Tag::U128 => exact.to_u128().map(Value::U128),
        Tag::I32 => exact.to_i32().map(Value::I32),
        Tag::I64 => exact.to_i64().map(Value::I64),
        Tag::I128 => exact.to_i128().map(Value::I128),
        _ => None,
    }
}

pub(crate) fn fit_or_overflow(exact: &Exact, target: Tag, what: impl fmt::Display) -> Result<Value> {
    fit(exact, target).ok_or_else(|| {
        VarError::overflow(format!("{what}: result {exact} does not fit {target}"))
    })
}

/// Two's-complement truncation of a 128-bit pattern to an integer tag.
pub fn wrap_bits(bits: u128, target: Tag) -> Value {
    match target {
        Tag::U32 => Value::U32(bits as u32),
        Tag::U64 => Value::U64(bits as u64),
        Tag::U128 => Value::U128(bits),
        Tag::I32 => Value::I32(bits as i32),
        Tag::I64 => Value::I64(bits as i64),
        _ => Value::I128(bits as i128),
    }
}

pub fn wrap(exact: &Exact, target: Tag) -> Value {
    wrap_bits(exact.low_bits(), target)
}

const UNSIGNED_LADDER: [Tag; 3] = [Tag::U32, Tag::U64, Tag::U128];
const SIGNED_LADDER: [Tag; 3] = [Tag::I32, Tag::I64, Tag::I128];

/// Narrowest tag holding `exact`.
///
/// With `unsigned_operands` and a non-negative result the unsigned widths are
/// tried first. Results beyond 128 bits fall back to a float (`F32` only when
/// it represents the value exactly); past `f64` range the result overflows.
pub fn promote_integer(exact: &Exact, unsigned_operands: bool) -> Result<Value> {
    let unsigned = if unsigned_operands && !exact.is_negative() {
        &UNSIGNED_LADDER[..]
    } else {
        &[]
    };
    for &tag in unsigned.iter().chain(SIGNED_LADDER.iter()) {
        if let Some(value) = fit(exact, tag) {
            trace!(result = %tag, "promoted integer result");
            return Ok(value);
        }
    }

    let f = exact.to_f64();
    if !f.is_finite() {
        return Err(VarError::overflow(format!(
            "result {exact} exceeds the range of every numeric type"
        )));
    }
    let exact_in_f64 = BigInt::from_f64(f).is_some_and(|back| back == exact.to_bigint());
    let narrow = f as f32;
    let value = if exact_in_f64 && f64::from(narrow) == f {
        Value::F32(narrow)
    } else {
        Value::F64(f)
    };
    trace!(result = %value.tag(), "promoted integer result to float");
    Ok(value)
}

/// Narrowest float tag for `f`.
///
/// An infinite result from finite operands overflows; other non-finite
/// results pass through as `F64`.
pub fn promote_float(f: f64, operands_finite: bool) -> Result<Value> {
    if f.is_infinite() && operands_finite {
        return Err(VarError::overflow("float result out of range"));
    }
    if !f.is_finite() {
        return Ok(Value::F64(f));
    }
    let narrow = f as f32;
    if f64::from(narrow) == f {
        Ok(Value::F32(narrow))
    } else {
        Ok(Value::F64(f))
    }
}
