//! Tests for overflow policies, type promotion and the numeric named
//! functions.

use num_bigint::BigInt;

use dynvar_core::promotion::{native_target, promote_float, promote_integer, Exact, Num};
use dynvar_core::{ops, ErrorKind, Policy, Tag, Value};

fn kind(result: dynvar_core::Result<Value>) -> ErrorKind {
    result.unwrap_err().kind()
}

fn v(i: i32) -> Value {
    Value::from(i)
}

// ============================================================================
// Native target
// ============================================================================

#[test]
fn native_target_of_integer_pairs() {
    assert_eq!(native_target(Tag::Bool, Tag::Bool), Tag::I32);
    assert_eq!(native_target(Tag::Bool, Tag::U64), Tag::U64);
    assert_eq!(native_target(Tag::U32, Tag::U64), Tag::U64);
    assert_eq!(native_target(Tag::U32, Tag::I64), Tag::I64);
    assert_eq!(native_target(Tag::U64, Tag::I32), Tag::I64);
    assert_eq!(native_target(Tag::U128, Tag::I32), Tag::I128);
}

#[test]
fn native_target_of_float_pairs() {
    assert_eq!(native_target(Tag::F32, Tag::I128), Tag::F32);
    assert_eq!(native_target(Tag::F32, Tag::F64), Tag::F64);
    assert_eq!(native_target(Tag::U32, Tag::F64), Tag::F64);
}

// ============================================================================
// Throw
// ============================================================================

#[test]
fn throw_is_the_named_default() {
    assert_eq!(Policy::NAMED_DEFAULT, Policy::Throw);
    assert_eq!(Policy::default(), Policy::Throw);
    assert_eq!(Policy::OPERATOR_DEFAULT, Policy::RawNoCheck);
}

#[test]
fn throw_raises_when_result_leaves_native_width() {
    assert_eq!(kind(ops::add(&v(i32::MAX), &v(1))), ErrorKind::Overflow);
    assert_eq!(
        kind(ops::sub(&Value::from(0u32), &Value::from(1u32))),
        ErrorKind::Overflow
    );
    assert_eq!(
        kind(ops::mul(&Value::from(u64::MAX), &Value::from(2u32))),
        ErrorKind::Overflow
    );
}

#[test]
fn throw_keeps_results_that_fit() {
    assert_eq!(ops::add(&v(i32::MAX - 1), &v(1)).unwrap(), Value::I32(i32::MAX));
    assert_eq!(
        ops::add(&Value::from(5u32), &Value::from(-10i32)).unwrap(),
        Value::I32(-5)
    );
    assert_eq!(
        ops::mul(&Value::from(u32::MAX), &Value::from(2u64)).unwrap(),
        Value::U64(u64::from(u32::MAX) * 2)
    );
    assert_eq!(ops::add(&Value::from(true), &Value::from(true)).unwrap(), Value::I32(2));
}

#[test]
fn throw_result_keeps_the_native_tag() {
    let sum = ops::add(&Value::from(1u64), &Value::from(2u32)).unwrap();
    assert_eq!(sum.tag(), Tag::U64);
    let mixed = ops::add(&Value::from(1i64), &Value::from(2u128)).unwrap();
    assert_eq!(mixed.tag(), Tag::I128);
}

#[test]
fn throw_floor_div_of_min_by_minus_one_overflows() {
    assert_eq!(kind(ops::floor_div(&v(i32::MIN), &v(-1))), ErrorKind::Overflow);
    assert_eq!(ops::modulo(&v(i32::MIN), &v(-1)).unwrap(), Value::I32(0));
}

#[test]
fn throw_float_overflow_from_finite_operands() {
    let big = Value::from(f64::MAX);
    assert_eq!(kind(ops::mul(&big, &Value::from(2.0))), ErrorKind::Overflow);
    let inf = Value::from(f64::INFINITY);
    assert_eq!(ops::add(&inf, &Value::from(1.0)).unwrap(), inf);
}

// ============================================================================
// Promote
// ============================================================================

#[test]
fn promote_widens_unsigned_first() {
    let r = ops::add_with(&Value::from(u32::MAX), &Value::from(1u32), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::U64);
    assert_eq!(r, Value::U64(1 << 32));
}

#[test]
fn promote_picks_the_narrowest_tag() {
    let r = ops::add_with(&Value::from(1u64), &Value::from(2u64), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::U32);
    let r = ops::add_with(&Value::from(1i64), &Value::from(2i64), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::I32);
}

#[test]
fn promote_negative_unsigned_result_goes_signed() {
    let r = ops::sub_with(&Value::from(0u32), &Value::from(1u32), Policy::Promote).unwrap();
    assert_eq!(r, Value::I32(-1));
    assert_eq!(r.tag(), Tag::I32);
}

#[test]
fn promote_signed_operands_skip_the_unsigned_ladder() {
    let r = ops::add_with(&v(i32::MAX), &v(1), Policy::Promote).unwrap();
    assert_eq!(r, Value::I64(1 << 31));
    assert_eq!(r.tag(), Tag::I64);

    let r = ops::mul_with(&Value::from(i64::MAX), &Value::from(2i64), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::I128);
    assert_eq!(r, Value::I128(i128::from(i64::MAX) * 2));
}

#[test]
fn promote_past_128_bits_falls_back_to_float() {
    let r = ops::add_with(&Value::from(u128::MAX), &Value::from(1u128), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::F64);
    assert_eq!(r, Value::F64(2f64.powi(128)));
}

#[test]
fn promote_float_results_narrow_when_exact() {
    let r = ops::add_with(&Value::from(0.5), &Value::from(0.25), Policy::Promote).unwrap();
    assert_eq!(r, Value::F32(0.75));
    let r = ops::add_with(&Value::from(0.1), &Value::from(0.2), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::F64);
    assert_eq!(
        kind(ops::mul_with(&Value::from(f64::MAX), &Value::from(2.0), Policy::Promote)),
        ErrorKind::Overflow
    );
}

#[test]
fn promote_integer_ladder() {
    assert_eq!(promote_integer(&Exact::from(5i128), true).unwrap(), Value::U32(5));
    assert_eq!(promote_integer(&Exact::from(5i128), false).unwrap().tag(), Tag::I32);
    assert_eq!(promote_integer(&Exact::from(-5i128), true).unwrap().tag(), Tag::I32);
    assert_eq!(
        promote_integer(&Exact::from(1i128 << 100), false).unwrap().tag(),
        Tag::I128
    );
    let past_i128 = Exact::from(BigInt::from(u128::MAX));
    assert_eq!(promote_integer(&past_i128, true).unwrap().tag(), Tag::U128);
    assert_eq!(promote_integer(&past_i128, false).unwrap().tag(), Tag::F64);

    let huge = Exact::from(BigInt::from(1) << 2000usize);
    assert_eq!(
        promote_integer(&huge, false).unwrap_err().kind(),
        ErrorKind::Overflow
    );
}

#[test]
fn promote_float_picks_f32_only_when_exact() {
    assert_eq!(promote_float(1.5, true).unwrap().tag(), Tag::F32);
    assert_eq!(promote_float(0.1, true).unwrap().tag(), Tag::F64);
    assert!(promote_float(f64::INFINITY, true).is_err());
    assert!(promote_float(f64::INFINITY, false).is_ok());
}

#[test]
fn exact_scratch_leaves_i128_only_when_needed() {
    let max = Exact::from(i128::MAX);
    assert_eq!(max.add(&Exact::from(-1i128)), Exact::Small(i128::MAX - 1));
    let over = max.add(&Exact::from(1i128));
    assert!(matches!(over, Exact::Big(_)));
    assert_eq!(over.to_bigint(), BigInt::from(i128::MAX) + 1);
    assert_eq!(over.sub(&Exact::from(1i128)), Exact::Small(i128::MAX));
    assert_eq!(Exact::from(-7i128).div_floor(&Exact::from(2i128)), Exact::Small(-4));
    assert_eq!(Exact::from(-7i128).rem(&Exact::from(2i128)), Exact::Small(-1));
    assert_eq!(Exact::from(i128::MIN).neg().to_bigint(), -BigInt::from(i128::MIN));
}

#[test]
fn num_compares_mathematically() {
    let int = Num::of(&Value::from(3)).unwrap();
    let float = Num::of(&Value::from(3.5)).unwrap();
    assert!(int.compare(float).unwrap().is_lt());
    let huge = Num::of(&Value::from(u128::MAX)).unwrap();
    assert!(matches!(huge, Num::Huge(_)));
    assert!(huge.compare(int).unwrap().is_gt());
    assert!(Num::of(&Value::from(f64::NAN)).unwrap().compare(int).is_none());
    assert!(Num::of(&Value::from("3")).is_none());
}

// ============================================================================
// Wrap and RawNoCheck
// ============================================================================

#[test]
fn wrap_truncates_to_native_width() {
    assert_eq!(
        ops::add_with(&v(i32::MAX), &v(1), Policy::Wrap).unwrap(),
        Value::I32(i32::MIN)
    );
    assert_eq!(
        ops::sub_with(&Value::from(0u32), &Value::from(1u32), Policy::Wrap).unwrap(),
        Value::U32(u32::MAX)
    );
    assert_eq!(
        ops::mul_with(&Value::from(u64::MAX), &Value::from(2u64), Policy::Wrap).unwrap(),
        Value::U64(u64::MAX - 1)
    );
}

#[test]
fn wrap_on_mixed_widths_uses_the_general_path() {
    // u32::MAX + 1 in the I32 target.
    assert_eq!(
        ops::add_with(&Value::from(u32::MAX), &v(1), Policy::Wrap).unwrap(),
        Value::I32(0)
    );
    assert_eq!(
        ops::floor_div_with(&v(i32::MIN), &v(-1), Policy::Wrap).unwrap(),
        Value::I32(i32::MIN)
    );
}

#[test]
fn raw_no_check_without_overflow_matches_native() {
    assert_eq!(
        ops::add_with(&v(2), &v(3), Policy::RawNoCheck).unwrap(),
        Value::I32(5)
    );
    assert_eq!(
        ops::mul_with(&Value::from(6u64), &Value::from(7u32), Policy::RawNoCheck).unwrap(),
        Value::U64(42)
    );
    assert_eq!(
        ops::modulo_with(&v(-7), &v(2), Policy::RawNoCheck).unwrap(),
        Value::I32(-1)
    );
}

#[test]
fn raw_no_check_modulo_of_min_by_minus_one_is_zero() {
    assert_eq!((&Value::I32(i32::MIN) % &Value::I32(-1)).unwrap(), Value::I32(0));
    assert_eq!(
        ops::modulo_with(&Value::I64(i64::MIN), &Value::I64(-1), Policy::RawNoCheck).unwrap(),
        Value::I64(0)
    );
    // Mixed widths go through the general path.
    assert_eq!(
        ops::modulo_with(&Value::I128(i128::MIN), &Value::I32(-1), Policy::RawNoCheck).unwrap(),
        Value::I128(0)
    );
}

#[test]
fn infix_operators_use_the_operator_default() {
    let (a, b) = (v(7), v(2));
    assert_eq!((&a + &b).unwrap(), Value::I32(9));
    assert_eq!((&a - &b).unwrap(), Value::I32(5));
    assert_eq!((&a * &b).unwrap(), Value::I32(14));
    assert_eq!((&a / &b).unwrap(), Value::F64(3.5));
    assert_eq!((&a % &b).unwrap(), Value::I32(1));
    assert_eq!((-&a).unwrap(), Value::I32(-7));
    assert_eq!(!&a, Value::Bool(false));
    assert_eq!((a + b).unwrap(), Value::I32(9));
    assert_eq!((Value::from("x") + Value::from("y")).unwrap(), Value::from("xy"));
}

// ============================================================================
// Division
// ============================================================================

#[test]
fn divide_always_yields_float() {
    for policy in Policy::ALL {
        let q = ops::div_with(&v(4), &v(2), policy).unwrap();
        assert!(q.is_float(), "{policy}: {q:?}");
        assert_eq!(q, Value::F64(2.0), "{policy}");
    }
    assert_eq!(ops::div(&v(1), &v(4)).unwrap(), Value::F64(0.25));
    assert_eq!(
        ops::div(&Value::from(3.0f32), &Value::from(2.0f32)).unwrap(),
        Value::F32(1.5)
    );
}

#[test]
fn divide_by_zero_under_every_policy() {
    for policy in Policy::ALL {
        assert_eq!(kind(ops::div_with(&v(1), &v(0), policy)), ErrorKind::DivisionByZero);
        assert_eq!(
            kind(ops::floor_div_with(&v(1), &v(0), policy)),
            ErrorKind::DivisionByZero
        );
        assert_eq!(
            kind(ops::modulo_with(&Value::from(1u64), &Value::from(0u64), policy)),
            ErrorKind::DivisionByZero
        );
        assert_eq!(
            kind(ops::div_with(&Value::from(1.0), &Value::from(0.0), policy)),
            ErrorKind::DivisionByZero
        );
    }
}

#[test]
fn floor_division_and_truncating_modulo() {
    assert_eq!(ops::floor_div(&v(-7), &v(2)).unwrap(), Value::I32(-4));
    assert_eq!(ops::floor_div(&v(7), &v(2)).unwrap(), Value::I32(3));
    assert_eq!(ops::modulo(&v(-7), &v(2)).unwrap(), Value::I32(-1));
    assert_eq!(ops::modulo(&v(7), &v(-2)).unwrap(), Value::I32(1));
    assert_eq!(
        ops::floor_div(&Value::from(7.5), &Value::from(2.0)).unwrap(),
        Value::F64(3.0)
    );
    assert_eq!(
        ops::modulo(&Value::from(7.5), &Value::from(2.0)).unwrap(),
        Value::F64(1.5)
    );
}

#[test]
fn float_width_follows_the_widest_float() {
    let r = ops::add(&Value::from(1.5f32), &v(1)).unwrap();
    assert_eq!(r, Value::F32(2.5));
    assert_eq!(r.tag(), Tag::F32);
    let r = ops::add(&Value::from(1.5f32), &Value::from(1.0f64)).unwrap();
    assert_eq!(r.tag(), Tag::F64);
}

// ============================================================================
// pow
// ============================================================================

#[test]
fn integer_pow_stays_integral() {
    assert_eq!(ops::pow(&v(2), &v(10)).unwrap(), Value::I32(1024));
    assert_eq!(ops::pow(&v(-3), &v(3)).unwrap(), Value::I32(-27));
    assert_eq!(ops::pow(&v(0), &v(0)).unwrap(), Value::I32(1));
    assert_eq!(ops::pow(&Value::from(-1i64), &Value::from(u64::MAX)).unwrap(), Value::I64(-1));
}

#[test]
fn integer_pow_follows_policy() {
    assert_eq!(kind(ops::pow(&v(2), &v(31))), ErrorKind::Overflow);
    assert_eq!(
        ops::pow_with(&v(2), &v(31), Policy::Promote).unwrap(),
        Value::I64(1 << 31)
    );
    assert_eq!(
        ops::pow_with(&Value::from(2u32), &v(40), Policy::Promote).unwrap(),
        Value::U64(1 << 40)
    );
    assert_eq!(ops::pow_with(&v(2), &v(32), Policy::Wrap).unwrap(), Value::I32(0));
    assert_eq!(ops::pow_with(&v(3), &v(4), Policy::RawNoCheck).unwrap(), Value::I32(81));
}

#[test]
fn huge_pow_is_rejected_without_computing_it() {
    assert_eq!(
        kind(ops::pow(&v(2), &Value::from(1u64 << 40))),
        ErrorKind::Overflow
    );
    assert_eq!(
        kind(ops::pow_with(&v(10), &v(400), Policy::Promote)),
        ErrorKind::Overflow
    );
    let r = ops::pow_with(&v(10), &v(300), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::F64);
}

#[test]
fn negative_or_float_exponent_gives_float() {
    assert_eq!(ops::pow(&v(2), &v(-1)).unwrap(), Value::F64(0.5));
    let root = ops::pow(&Value::from(2.0), &Value::from(0.5)).unwrap();
    assert!((root.as_f64().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert_eq!(kind(ops::pow(&v(0), &v(-1))), ErrorKind::DivisionByZero);
    assert_eq!(kind(ops::pow(&Value::from("2"), &v(2))), ErrorKind::TypeMismatch);
}

// ============================================================================
// factorial, gcd, lcm, neg
// ============================================================================

#[test]
fn factorial_by_policy() {
    assert_eq!(ops::factorial(&v(0)).unwrap(), Value::I32(1));
    assert_eq!(ops::factorial(&v(5)).unwrap(), Value::I32(120));
    assert_eq!(kind(ops::factorial(&v(13))), ErrorKind::Overflow);
    assert_eq!(
        ops::factorial_with(&v(13), Policy::Promote).unwrap(),
        Value::I64(6_227_020_800)
    );
    assert_eq!(
        ops::factorial_with(&Value::from(13u32), Policy::Wrap).unwrap(),
        Value::U32((6_227_020_800u64 % (1 << 32)) as u32)
    );
    assert!(ops::factorial(&Value::from(34u128)).is_ok());
}

#[test]
fn factorial_limits() {
    let r = ops::factorial_with(&v(170), Policy::Promote).unwrap();
    assert_eq!(r.tag(), Tag::F64);
    assert_eq!(
        kind(ops::factorial_with(&v(171), Policy::Promote)),
        ErrorKind::Overflow
    );
    assert_eq!(
        ops::factorial_with(&Value::from(200u64), Policy::Wrap).unwrap(),
        Value::U64(0)
    );
}

#[test]
fn factorial_rejects_bad_input() {
    assert_eq!(kind(ops::factorial(&v(-1))), ErrorKind::Value);
    assert_eq!(kind(ops::factorial(&Value::from(3.0))), ErrorKind::TypeMismatch);
}

#[test]
fn gcd_and_lcm() {
    assert_eq!(ops::gcd(&v(12), &v(18)).unwrap(), Value::I32(6));
    assert_eq!(ops::gcd(&v(-12), &v(18)).unwrap(), Value::I32(6));
    assert_eq!(ops::gcd(&v(0), &v(0)).unwrap(), Value::I32(0));
    assert_eq!(ops::lcm(&v(4), &v(6)).unwrap(), Value::I32(12));
    assert_eq!(ops::lcm(&v(0), &v(5)).unwrap(), Value::I32(0));
    assert_eq!(kind(ops::gcd(&v(4), &Value::from(2.0))), ErrorKind::TypeMismatch);
}

#[test]
fn lcm_overflow_follows_policy() {
    let (a, b) = (Value::from(u32::MAX), Value::from(u32::MAX - 1));
    assert_eq!(kind(ops::lcm(&a, &b)), ErrorKind::Overflow);
    let r = ops::lcm_with(&a, &b, Policy::Promote).unwrap();
    assert_eq!(r, Value::U64(u64::from(u32::MAX) * u64::from(u32::MAX - 1)));
}

#[test]
fn neg_by_policy() {
    assert_eq!(ops::neg(&v(5)).unwrap(), Value::I32(-5));
    assert_eq!(ops::neg(&Value::from(0u32)).unwrap(), Value::U32(0));
    assert_eq!(kind(ops::neg(&Value::from(5u32))), ErrorKind::Overflow);
    assert_eq!(
        ops::neg_with(&Value::from(5u32), Policy::Promote).unwrap(),
        Value::I32(-5)
    );
    assert_eq!(kind(ops::neg(&v(i32::MIN))), ErrorKind::Overflow);
    assert_eq!(ops::neg_with(&v(i32::MIN), Policy::Wrap).unwrap(), Value::I32(i32::MIN));
    assert_eq!(ops::neg(&Value::from(1.5f32)).unwrap(), Value::F32(-1.5));
    assert_eq!(kind(ops::neg(&Value::from("x"))), ErrorKind::TypeMismatch);
}

// ============================================================================
// Policy parsing
// ============================================================================

#[test]
fn policy_parses_from_text_and_serde() {
    assert_eq!("promote".parse::<Policy>().unwrap(), Policy::Promote);
    assert_eq!("raw-no-check".parse::<Policy>().unwrap(), Policy::RawNoCheck);
    assert_eq!("WRAP".parse::<Policy>().unwrap(), Policy::Wrap);
    assert_eq!("saturate".parse::<Policy>().unwrap_err().kind(), ErrorKind::Value);

    let parsed: Policy = serde_json::from_str("\"raw_no_check\"").unwrap();
    assert_eq!(parsed, Policy::RawNoCheck);
    assert_eq!(serde_json::to_string(&Policy::Throw).unwrap(), "\"throw\"");
    for policy in Policy::ALL {
        assert_eq!(policy.to_string().parse::<Policy>().unwrap(), policy);
    }
}
