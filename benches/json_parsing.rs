//! JSON parse, encode and JSONPath benchmarks
//!
//! Documents are arrays of small records, from 10 to 10,000 elements.
//!
//! Run benchmarks: `cargo bench --bench json_parsing`
//!
//! Compare a single stage:
//! ```
//! cargo bench --bench json_parsing -- "json_encode"
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pcl::json::{JsonPath, encode, parse_all};
use std::hint::black_box;

fn generate_document(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "name": "Record {i}", "price": {}.25, "tags": ["a", "b\/c"], "active": {}}}"#,
                i * 3,
                i % 2 == 0
            )
        })
        .collect();
    format!("[{}]", records.join(",\n"))
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parse");

    for count in [10, 1_000, 10_000] {
        let doc = generate_document(count);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("records", count), &doc, |b, doc| {
            b.iter(|| parse_all(black_box(doc)).expect("Failed to parse"));
        });
    }

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_encode");
    let value = parse_all(&generate_document(1_000)).expect("Failed to parse");

    group.bench_function("compact", |b| b.iter(|| encode(black_box(&value), false)));
    group.bench_function("pretty", |b| b.iter(|| encode(black_box(&value), true)));

    group.finish();
}

fn benchmark_jsonpath(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_path");
    let value = parse_all(&generate_document(1_000)).expect("Failed to parse");

    for expr in ["$[*].name", "$..tags[1]", "$[10:500:3].price"] {
        let path = JsonPath::compile(expr).expect("Failed to compile path");
        group.bench_with_input(BenchmarkId::new("match", expr), &path, |b, path| {
            b.iter(|| path.matches(black_box(&value)).len());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_encode, benchmark_jsonpath);
criterion_main!(benches);
