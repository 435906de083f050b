//! Numeric kernels: the arithmetic cells of the dispatch tables and the
//! numeric named functions (`pow`, `factorial`, `gcd`, `lcm`, `neg`).
//!
//! Every kernel follows the same order of events: operand check, zero-divisor
//! check (all policies), then the policy decides how the result is settled.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Float, One, ToPrimitive, Zero};

use crate::dispatch::BinaryOp;
use crate::error::{Result, VarError};
use crate::policy::Policy;
use crate::promotion::{
    fit_or_overflow, native_target, promote_float, promote_integer, wrap, wrap_bits, Exact, Num,
};
use crate::tag::Tag;
use crate::value::Value;

/// Arithmetic operators. Discriminants match [`BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArithOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    FloorDiv = 4,
    Mod = 5,
}

impl ArithOp {
    pub const ALL: [ArithOp; 6] = [
        ArithOp::Add,
        ArithOp::Sub,
        ArithOp::Mul,
        ArithOp::Div,
        ArithOp::FloorDiv,
        ArithOp::Mod,
    ];

    pub(crate) const fn from_code(code: u8) -> ArithOp {
        match code {
            0 => ArithOp::Add,
            1 => ArithOp::Sub,
            2 => ArithOp::Mul,
            3 => ArithOp::Div,
            4 => ArithOp::FloorDiv,
            _ => ArithOp::Mod,
        }
    }

    pub const fn binary_op(self) -> BinaryOp {
        match self {
            ArithOp::Add => BinaryOp::Add,
            ArithOp::Sub => BinaryOp::Sub,
            ArithOp::Mul => BinaryOp::Mul,
            ArithOp::Div => BinaryOp::Div,
            ArithOp::FloorDiv => BinaryOp::FloorDiv,
            ArithOp::Mod => BinaryOp::Mod,
        }
    }

    const fn divides(self) -> bool {
        matches!(self, ArithOp::Div | ArithOp::FloorDiv | ArithOp::Mod)
    }

    const fn zero_context(self) -> &'static str {
        match self {
            ArithOp::Mod => "modulo",
            ArithOp::FloorDiv => "integer division",
            _ => "division",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.binary_op(), f)
    }
}

fn overflow_in(op: impl fmt::Display, target: Tag) -> VarError {
    VarError::overflow(format!("{op}: result does not fit {target}"))
}

// ============================================================================
// General numeric cell
// ============================================================================

/// Any numeric pair under any policy.
pub fn numeric(op: ArithOp, a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    let (lt, rt) = (a.tag(), b.tag());
    let (Some(x), Some(y)) = (Num::of(a), Num::of(b)) else {
        return Err(VarError::UnsupportedOperands {
            op: op.binary_op(),
            left: lt,
            right: rt,
        });
    };
    if op.divides() && y.is_zero() {
        return Err(VarError::DivisionByZero(op.zero_context()));
    }

    let target = native_target(lt, rt);
    if op == ArithOp::Div {
        // True division always yields a float.
        let float_target = if target == Tag::F32 { Tag::F32 } else { Tag::F64 };
        return float_arith(op, x.to_f64(), y.to_f64(), float_target, policy);
    }
    if target.is_float() {
        return float_arith(op, x.to_f64(), y.to_f64(), target, policy);
    }

    let unsigned = lt.is_unsigned() && rt.is_unsigned();
    if policy == Policy::RawNoCheck {
        return Ok(raw_integer(op, x.bits(), y.bits(), target));
    }
    let (l, r) = (x.to_exact(), y.to_exact());
    let exact = match op {
        ArithOp::Add => l.add(&r),
        ArithOp::Sub => l.sub(&r),
        ArithOp::Mul => l.mul(&r),
        ArithOp::Mod => l.rem(&r),
        // Div was handled above.
        ArithOp::Div | ArithOp::FloorDiv => l.div_floor(&r),
    };
    match policy {
        Policy::Throw => fit_or_overflow(&exact, target, op),
        Policy::Promote => promote_integer(&exact, unsigned),
        Policy::Wrap | Policy::RawNoCheck => Ok(wrap(&exact, target)),
    }
}

pub(crate) fn numeric_cell<const OP: u8>(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    numeric(ArithOp::from_code(OP), a, b, policy)
}

fn float_op<F: Float>(op: ArithOp, a: F, b: F) -> F {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::FloorDiv => (a / b).floor(),
        ArithOp::Mod => a % b,
    }
}

fn float_arith(op: ArithOp, x: f64, y: f64, target: Tag, policy: Policy) -> Result<Value> {
    let finite = x.is_finite() && y.is_finite();
    if policy == Policy::Promote {
        return promote_float(float_op(op, x, y), finite);
    }
    let (result_finite, value) = if target == Tag::F32 {
        let r = float_op(op, x as f32, y as f32);
        (r.is_finite(), Value::F32(r))
    } else {
        let r = float_op(op, x, y);
        (r.is_finite(), Value::F64(r))
    };
    if policy == Policy::Throw && finite && !result_finite {
        return Err(overflow_in(op, target));
    }
    Ok(value)
}

/// Native `as` casts and native operators: panics or wraps exactly as the
/// build's `overflow-checks` setting dictates.
fn raw_integer(op: ArithOp, x: i128, y: i128, target: Tag) -> Value {
    macro_rules! raw {
        ($t:ty, $variant:ident) => {{
            let (a, b) = (x as $t, y as $t);
            Value::$variant(match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div | ArithOp::FloorDiv => Integer::div_floor(&a, &b),
                // MIN % -1 is 0, not an overflow.
                ArithOp::Mod => a.wrapping_rem(b),
            })
        }};
    }
    match target {
        Tag::U32 => raw!(u32, U32),
        Tag::U64 => raw!(u64, U64),
        Tag::U128 => raw!(u128, U128),
        Tag::I32 => raw!(i32, I32),
        Tag::I64 => raw!(i64, I64),
        _ => raw!(i128, I128),
    }
}

// ============================================================================
// Same-width integer fast cells
// ============================================================================

/// A native integer type backing one integer tag.
pub(crate) trait NativeInt: Copy + PartialEq + fmt::Display {
    const TAG: Tag;
    const ZERO: Self;

    fn get(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
    fn checked(op: ArithOp, a: Self, b: Self) -> Option<Self>;
    fn wrapping(op: ArithOp, a: Self, b: Self) -> Self;
    fn raw(op: ArithOp, a: Self, b: Self) -> Self;
}

macro_rules! native_int {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl NativeInt for $t {
                const TAG: Tag = Tag::$variant;
                const ZERO: Self = 0;

                #[inline]
                fn get(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn checked(op: ArithOp, a: Self, b: Self) -> Option<Self> {
                    match op {
                        ArithOp::Add => a.checked_add(b),
                        ArithOp::Sub => a.checked_sub(b),
                        ArithOp::Mul => a.checked_mul(b),
                        ArithOp::Div | ArithOp::FloorDiv => {
                            a.checked_div(b).map(|_| Integer::div_floor(&a, &b))
                        }
                        // MIN % -1 is 0, which always fits.
                        ArithOp::Mod => Some(a.wrapping_rem(b)),
                    }
                }

                #[inline]
                fn wrapping(op: ArithOp, a: Self, b: Self) -> Self {
                    match op {
                        ArithOp::Add => a.wrapping_add(b),
                        ArithOp::Sub => a.wrapping_sub(b),
                        ArithOp::Mul => a.wrapping_mul(b),
                        ArithOp::Div | ArithOp::FloorDiv => match a.checked_div(b) {
                            Some(_) => Integer::div_floor(&a, &b),
                            None => a.wrapping_div(b),
                        },
                        ArithOp::Mod => a.wrapping_rem(b),
                    }
                }

                #[inline]
                fn raw(op: ArithOp, a: Self, b: Self) -> Self {
                    match op {
                        ArithOp::Add => a + b,
                        ArithOp::Sub => a - b,
                        ArithOp::Mul => a * b,
                        ArithOp::Div | ArithOp::FloorDiv => Integer::div_floor(&a, &b),
                        ArithOp::Mod => a.wrapping_rem(b),
                    }
                }
            }
        )*
    };
}

native_int! {
    u32 => U32,
    u64 => U64,
    u128 => U128,
    i32 => I32,
    i64 => I64,
    i128 => I128,
}

/// Monomorphized cell for two operands of the same integer tag. Promote goes
/// through the general path since its result tag depends on the value.
pub(crate) fn same_width_cell<T: NativeInt, const OP: u8>(
    a: &Value,
    b: &Value,
    policy: Policy,
) -> Result<Value> {
    let op = ArithOp::from_code(OP);
    let (Some(x), Some(y)) = (T::get(a), T::get(b)) else {
        return numeric(op, a, b, policy);
    };
    if op.divides() && y == T::ZERO {
        return Err(VarError::DivisionByZero(op.zero_context()));
    }
    match policy {
        Policy::Throw => T::checked(op, x, y)
            .map(T::into_value)
            .ok_or_else(|| VarError::overflow(format!("{x} {op} {y} does not fit {}", T::TAG))),
        Policy::Promote => numeric(op, a, b, policy),
        Policy::Wrap => Ok(T::wrapping(op, x, y).into_value()),
        Policy::RawNoCheck => Ok(T::raw(op, x, y).into_value()),
    }
}

// ============================================================================
// Named numeric functions
// ============================================================================

fn numeric_operand(value: &Value) -> Result<Num> {
    Num::of(value).ok_or_else(|| VarError::mismatch("numeric", value.tag()))
}

fn integer_operand(value: &Value) -> Result<Exact> {
    match Num::of(value) {
        Some(num) if value.is_integer() => Ok(num.to_exact()),
        _ => Err(VarError::mismatch("integer", value.tag())),
    }
}

/// Bit length beyond which a Promote result cannot be represented by any tag
/// (`f64::MAX` is just under 2^1024).
const PROMOTE_LIMIT_BITS: u64 = 1024;
/// Bit length beyond which a Throw result cannot fit any integer tag.
const THROW_LIMIT_BITS: u64 = 128;

/// `base ** exp`.
///
/// Integer base with a non-negative integer exponent stays integral and
/// follows `policy` relative to the base's native width. Anything else is
/// computed as a float.
pub fn pow(base: &Value, exp: &Value, policy: Policy) -> Result<Value> {
    let (bt, et) = (base.tag(), exp.tag());
    let x = numeric_operand(base)?;
    let y = numeric_operand(exp)?;

    if bt.is_integer() && et.is_integer() && !y.is_negative() {
        return integer_pow(&x.to_exact(), &y.to_exact(), native_target(bt, bt), bt.is_unsigned(), policy);
    }
    if x.is_zero() && y.is_negative() {
        return Err(VarError::DivisionByZero("negative-power division"));
    }

    let (bf, ef) = (x.to_f64(), y.to_f64());
    let finite = bf.is_finite() && ef.is_finite();
    if policy == Policy::Promote {
        return promote_float(bf.powf(ef), finite);
    }
    let target = if native_target(bt, et) == Tag::F32 {
        Tag::F32
    } else {
        Tag::F64
    };
    let (result_finite, value) = if target == Tag::F32 {
        let r = (bf as f32).powf(ef as f32);
        (r.is_finite(), Value::F32(r))
    } else {
        let r = bf.powf(ef);
        (r.is_finite(), Value::F64(r))
    };
    if policy == Policy::Throw && finite && !result_finite {
        return Err(overflow_in("**", target));
    }
    Ok(value)
}

fn integer_pow(base: &Exact, exp: &Exact, target: Tag, unsigned: bool, policy: Policy) -> Result<Value> {
    match policy {
        Policy::RawNoCheck => Ok(raw_pow(base.low_bits(), exp.to_u32().unwrap_or(u32::MAX), target)),
        Policy::Wrap => {
            let modulus = BigInt::one() << 128usize;
            let reduced = base.to_bigint().modpow(&exp.to_bigint(), &modulus);
            Ok(wrap(&Exact::from(reduced), target))
        }
        Policy::Throw => {
            let exact = exact_pow(base, exp, THROW_LIMIT_BITS)
                .ok_or_else(|| overflow_in("**", target))?;
            fit_or_overflow(&exact, target, "**")
        }
        Policy::Promote => {
            let exact = exact_pow(base, exp, PROMOTE_LIMIT_BITS).ok_or_else(|| {
                VarError::overflow("**: result exceeds the range of every numeric type")
            })?;
            promote_integer(&exact, unsigned)
        }
    }
}

/// Exact power, or `None` once the result is known to reach `2^limit_bits`
/// in magnitude. Never materializes such a result.
fn exact_pow(base: &Exact, exp: &Exact, limit_bits: u64) -> Option<Exact> {
    let big = base.to_bigint();
    if big.is_zero() {
        return Some(Exact::Small(if exp.is_zero() { 1 } else { 0 }));
    }
    if big.is_one() {
        return Some(Exact::Small(1));
    }
    if big == BigInt::from(-1) {
        return Some(Exact::Small(if exp.is_even() { 1 } else { -1 }));
    }
    // |base| >= 2^(bits - 1), so the result is at least 2^((bits - 1) * exp).
    let e = exp.to_u64()?;
    if (big.bits() - 1).saturating_mul(e) >= limit_bits {
        return None;
    }
    let e = u32::try_from(e).ok()?;
    Some(Exact::from(num_traits::pow::pow(big, e as usize)))
}

fn raw_pow(bits: u128, exp: u32, target: Tag) -> Value {
    match target {
        Tag::U32 => Value::U32((bits as u32).pow(exp)),
        Tag::U64 => Value::U64((bits as u64).pow(exp)),
        Tag::U128 => Value::U128(bits.pow(exp)),
        Tag::I32 => Value::I32((bits as i32).pow(exp)),
        Tag::I64 => Value::I64((bits as i64).pow(exp)),
        _ => Value::I128((bits as i128).pow(exp)),
    }
}

/// Largest `n` whose factorial fits 128 bits.
const FACTORIAL_MAX_INT: u64 = 34;
/// Largest `n` whose factorial is a finite `f64`.
const FACTORIAL_MAX_FLOAT: u64 = 170;

/// `n!` for a non-negative integer `n`, relative to `n`'s native width
/// (at least `I32`).
pub fn factorial(n: &Value, policy: Policy) -> Result<Value> {
    let tag = n.tag();
    let exact = integer_operand(n)?;
    if exact.is_negative() {
        return Err(VarError::InvalidValue(
            "factorial() not defined for negative values".to_string(),
        ));
    }
    let target = native_target(tag, tag);

    match policy {
        Policy::Wrap => {
            let mut acc: u128 = 1;
            let mut k: u128 = 2;
            let limit = exact.low_bits();
            // The product is divisible by 2^128 long before k gets large.
            while k <= limit && acc != 0 {
                acc = acc.wrapping_mul(k);
                k += 1;
            }
            Ok(wrap_bits(acc, target))
        }
        Policy::RawNoCheck => Ok(raw_factorial(exact.low_bits(), target)),
        Policy::Throw | Policy::Promote => {
            let limit = if policy == Policy::Throw {
                FACTORIAL_MAX_INT
            } else {
                FACTORIAL_MAX_FLOAT
            };
            let count = exact
                .to_u64()
                .filter(|&count| count <= limit)
                .ok_or_else(|| VarError::overflow(format!("factorial({exact}) is too large")))?;
            let mut acc = Exact::Small(1);
            for k in 2..=count {
                acc = acc.mul(&Exact::Small(i128::from(k)));
            }
            if policy == Policy::Throw {
                fit_or_overflow(&acc, target, "factorial")
            } else {
                promote_integer(&acc, tag.is_unsigned())
            }
        }
    }
}

fn raw_factorial(bits: u128, target: Tag) -> Value {
    macro_rules! raw {
        ($t:ty, $variant:ident) => {{
            let n = bits as $t;
            let mut acc: $t = 1;
            let mut k: $t = 2;
            while k <= n && acc != 0 {
                acc *= k;
                k += 1;
            }
            Value::$variant(acc)
        }};
    }
    match target {
        Tag::U32 => raw!(u32, U32),
        Tag::U64 => raw!(u64, U64),
        Tag::U128 => raw!(u128, U128),
        Tag::I32 => raw!(i32, I32),
        Tag::I64 => raw!(i64, I64),
        _ => raw!(i128, I128),
    }
}

/// Greatest common divisor; always non-negative.
pub fn gcd(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    integer_pair("gcd", a, b, policy, |x, y| x.gcd(&y))
}

/// Least common multiple; always non-negative, zero if either side is zero.
pub fn lcm(a: &Value, b: &Value, policy: Policy) -> Result<Value> {
    integer_pair("lcm", a, b, policy, |x, y| x.lcm(&y))
}

// Native integers have no overflow-free gcd/lcm primitive, so RawNoCheck
// settles like Wrap.
fn integer_pair(
    name: &str,
    a: &Value,
    b: &Value,
    policy: Policy,
    f: impl FnOnce(BigInt, BigInt) -> BigInt,
) -> Result<Value> {
    let x = integer_operand(a)?;
    let y = integer_operand(b)?;
    let (lt, rt) = (a.tag(), b.tag());
    let exact = Exact::from(f(x.to_bigint(), y.to_bigint()));
    let target = native_target(lt, rt);
    match policy {
        Policy::Throw => fit_or_overflow(&exact, target, name),
        Policy::Promote => promote_integer(&exact, lt.is_unsigned() && rt.is_unsigned()),
        Policy::Wrap | Policy::RawNoCheck => Ok(wrap(&exact, target)),
    }
}

/// Unary minus. Negating a non-zero unsigned value overflows under Throw.
pub fn neg(a: &Value, policy: Policy) -> Result<Value> {
    let tag = a.tag();
    let x = numeric_operand(a)?;
    if let Num::Float(f) = x {
        return match (policy, tag) {
            (Policy::Promote, _) => promote_float(-f, f.is_finite()),
            (_, Tag::F32) => Ok(Value::F32(-(f as f32))),
            _ => Ok(Value::F64(-f)),
        };
    }

    let target = native_target(tag, tag);
    if policy == Policy::RawNoCheck {
        return Ok(raw_neg(x.bits(), target));
    }
    let exact = x.to_exact().neg();
    match policy {
        Policy::Throw => fit_or_overflow(&exact, target, "unary -"),
        Policy::Promote => promote_integer(&exact, tag.is_unsigned()),
        Policy::Wrap | Policy::RawNoCheck => Ok(wrap(&exact, target)),
    }
}

fn raw_neg(bits: i128, target: Tag) -> Value {
    macro_rules! raw {
        ($t:ty, $variant:ident) => {{
            let a = bits as $t;
            Value::$variant(0 - a)
        }};
    }
    match target {
        Tag::U32 => raw!(u32, U32),
        Tag::U64 => raw!(u64, U64),
        Tag::U128 => raw!(u128, U128),
        Tag::I32 => raw!(i32, I32),
        Tag::I64 => raw!(i64, I64),
        _ => raw!(i128, I128),
    }
}

// ============================================================================
// Bitwise
// ============================================================================

/// `&`, `|` or `^` on two integer operands, in two's complement at the pair's
/// native width. Bitwise results always fit, so the policy is not consulted.
/// Two `Bool`s stay `Bool`.
pub fn bitwise(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    if let (&Value::Bool(x), &Value::Bool(y)) = (a, b) {
        return Ok(Value::Bool(match op {
            BinaryOp::BitAnd => x & y,
            BinaryOp::BitOr => x | y,
            _ => x ^ y,
        }));
    }
    let (lt, rt) = (a.tag(), b.tag());
    let (Some(x), Some(y)) = (Num::of(a), Num::of(b)) else {
        return Err(VarError::UnsupportedOperands { op, left: lt, right: rt });
    };
    if !(lt.is_integer() && rt.is_integer()) {
        return Err(VarError::UnsupportedOperands { op, left: lt, right: rt });
    }
    let (l, r) = (x.bits() as u128, y.bits() as u128);
    let bits = match op {
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        _ => l ^ r,
    };
    Ok(wrap_bits(bits, native_target(lt, rt)))
}

pub(crate) fn bitwise_cell<const OP: u8>(a: &Value, b: &Value, _policy: Policy) -> Result<Value> {
    bitwise(BinaryOp::from_code(OP), a, b)
}

/// Bitwise complement. `Bool` complements as the integer 0 or 1.
pub fn invert(a: &Value) -> Result<Value> {
    let tag = a.tag();
    match Num::of(a) {
        Some(x) if tag.is_integer() => {
            Ok(wrap_bits(!(x.bits() as u128), native_target(tag, tag)))
        }
        _ => Err(VarError::mismatch("integer", tag)),
    }
}
