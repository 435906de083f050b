//! Operator dispatch benchmarks.
//!
//! Measures the per-call cost of table lookup plus the arithmetic kernel:
//! - Same-width integer addition under each overflow policy
//! - Mixed-width addition that has to compute a target tag
//! - Text concatenation and equality across kinds
//! - Unsupported pairs, which resolve to the error sentinel

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dynvar_core::{dispatch, ops, BinaryOp, Dispatcher, Policy, Value};

fn bench_same_width_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("same_width_add");
    let a = Value::from(1_000_i64);
    let b = Value::from(2_000_i64);

    for policy in Policy::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |bench, &p| {
            bench.iter(|| dispatch(BinaryOp::Add, black_box(&a), black_box(&b), p));
        });
    }
    group.finish();
}

fn bench_mixed_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_arithmetic");
    let pairs = [
        ("u32+i64", Value::from(7u32), Value::from(-3i64)),
        ("i32+f64", Value::from(7), Value::F64(0.5)),
        ("u128*i128", Value::U128(1 << 70), Value::I128(-3)),
    ];

    for (name, a, b) in &pairs {
        group.bench_function(*name, |bench| {
            bench.iter(|| ops::mul_with(black_box(a), black_box(b), Policy::Promote));
        });
    }

    group.bench_function("promote_past_u32", |bench| {
        let a = Value::from(u32::MAX);
        let b = Value::from(1u32);
        bench.iter(|| ops::add_with(black_box(&a), black_box(&b), Policy::Promote));
    });
    group.finish();
}

fn bench_heap_operands(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_operands");
    let left = Value::from("hello, ");
    let right = Value::from("world");
    group.bench_function("str_concat", |bench| {
        bench.iter(|| ops::add(black_box(&left), black_box(&right)));
    });

    for size in [16usize, 256] {
        let list = Value::list((0..size as i64).map(Value::from));
        let copy = list.clone();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_eq", size), &size, |bench, _| {
            bench.iter(|| ops::eq(black_box(&list), black_box(&copy)));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let dispatcher = Dispatcher::global();
    let none = Value::none();
    let num = Value::from(1);

    c.bench_function("unsupported_pair", |bench| {
        bench.iter(|| {
            dispatcher.apply(BinaryOp::Sub, black_box(&none), black_box(&num), Policy::Throw)
        });
    });
    c.bench_function("eq_across_kinds", |bench| {
        bench.iter(|| ops::eq(black_box(&none), black_box(&num)));
    });
}

criterion_group!(
    benches,
    bench_same_width_add,
    bench_mixed_arithmetic,
    bench_heap_operands,
    bench_lookup
);
criterion_main!(benches);
