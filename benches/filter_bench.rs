use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fhir_filter::{compile, filter_array, tokenize};
use serde_json::{Value, json};
use std::hint::black_box;

const CASES: [(&str, &str); 3] = [
    ("simple", r#"name eq "patient 1""#),
    ("medium", r#"visits gt 3 and dob ge 2001-01 or name sw "patient""#),
    (
        "complex",
        r#"not(dod eq null) and name[use eq "official" and family co "o"].family sw "d" or (q gt 100g and dob po 2001-06)"#,
    ),
];

fn records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": [
                    {"use": "old", "family": format!("Roe{}", i)},
                    {"use": "official", "family": format!("Doe{}", i)}
                ],
                "dob": format!("2001-{:02}-15", i % 12 + 1),
                "visits": i % 7,
                "dod": if i % 3 == 0 { Value::Null } else { json!("2020-07") },
                "q": format!("{}g", 90 + i % 40)
            })
        })
        .collect()
}

// Tokenizer throughput
fn benchmark_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for (name, filter) in CASES {
        group.bench_with_input(BenchmarkId::new("tokenize", name), &filter, |b, &filter| {
            b.iter(|| black_box(tokenize(black_box(filter))))
        });
    }

    group.finish();
}

// Tokenize plus parse
fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for (name, filter) in CASES {
        group.bench_with_input(BenchmarkId::new("compile", name), &filter, |b, &filter| {
            b.iter(|| black_box(compile(black_box(filter))))
        });
    }

    group.finish();
}

// Evaluation over record sets of growing size
fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for size in [10, 100, 1000] {
        let data = records(size);
        for (name, filter) in CASES {
            let Ok(compiled) = compile(filter) else {
                continue;
            };
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &data,
                |b, data| b.iter(|| black_box(compiled.apply(black_box(data)))),
            );
        }
    }

    group.finish();
}

// Compile and apply in one call
fn benchmark_filter_array(c: &mut Criterion) {
    let data = records(100);
    c.bench_function("filter_array/medium/100", |b| {
        b.iter(|| black_box(filter_array(black_box(&data), CASES[1].1)))
    });
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_compile,
    benchmark_evaluate,
    benchmark_filter_array
);
criterion_main!(benches);
