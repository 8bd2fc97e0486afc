//! Throughput of category recognition.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use dq_semantic::prelude::*;

const MIXED: &[&str] = &[
    "sliu@talend.com",
    "Paris",
    "(541) 754-3010",
    "Washington",
    "12 rue de la Paix",
    "Acme Widgets Inc",
    "+33123456789",
    "not a category",
    "",
    "192.168.0.1",
];

fn column(size: usize, distinct: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            let base = MIXED[i % MIXED.len()];
            let variant = i % distinct.max(1);
            if variant < MIXED.len() {
                base.to_string()
            } else {
                format!("{base} {variant}")
            }
        })
        .collect()
}

fn bench_process(c: &mut Criterion) {
    let builder = CategoryRecognizerBuilder::builtin().resolve().unwrap();

    let mut group = c.benchmark_group("recognizer_process");
    group.measurement_time(Duration::from_secs(10));

    for (name, distinct) in [("repetitive", 10), ("high_cardinality", 5_000)] {
        let values = column(5_000, distinct);
        group.throughput(Throughput::Elements(values.len() as u64));
        group.bench_with_input(BenchmarkId::new("builtin", name), &values, |b, values| {
            b.iter(|| {
                let mut recognizer = builder.build().unwrap();
                for value in values {
                    recognizer.process(black_box(Some(value.as_str()))).unwrap();
                }
                black_box(recognizer.result())
            });
        });
    }

    group.finish();
}

fn bench_fuzzy_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_lookup");

    for (name, fuzzy) in [("exact_only", false), ("fuzzy", true)] {
        let builder = CategoryRecognizerBuilder::builtin()
            .config(
                RecognizerConfig::default()
                    .with_fuzzy_matching(fuzzy)
                    .with_cache_capacity(1),
            )
            .resolve()
            .unwrap();
        group.bench_function(name, |b| {
            let mut recognizer = builder.build().unwrap();
            b.iter(|| {
                recognizer.process(black_box(Some("Marseile"))).unwrap();
                recognizer.process(black_box(Some("Toulouze"))).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_process, bench_fuzzy_lookup);
criterion_main!(benches);
