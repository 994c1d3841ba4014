use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Deserialize;
use toml_layout::{from_document, from_str, parse, to_string, tokenize, ParseOptions};

const EXAMPLE: &str = include_str!("../tests/fixtures/example.toml");

#[derive(Deserialize)]
#[allow(dead_code)]
struct Product {
    name: String,
    sku: u64,
    price: f64,
    tags: Vec<String>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Catalog {
    products: Vec<Product>,
}

fn catalog(size: usize) -> String {
    let mut out = String::from("# generated catalog\n");
    for i in 0..size {
        out.push_str(&format!(
            "\n[[products]] # entry {i}\n\tname = \"Product {i}\"\n\tsku = {}\n\tprice = {}.99\n\ttags = [\"a\", \"b\", \"c\"]\n",
            100_000 + i,
            i % 50
        ));
    }
    out
}

fn benchmark_tokenize(c: &mut Criterion) {
    let options = ParseOptions::default();
    c.bench_function("tokenize_example", |b| {
        b.iter(|| tokenize(black_box(EXAMPLE.as_bytes()), &options))
    });
}

fn benchmark_parse_example(c: &mut Criterion) {
    c.bench_function("parse_example", |b| {
        b.iter(|| parse(black_box(EXAMPLE.as_bytes())))
    });
}

fn benchmark_format_example(c: &mut Criterion) {
    let doc = parse(EXAMPLE.as_bytes()).unwrap();
    c.bench_function("format_example", |b| b.iter(|| to_string(black_box(&doc))));
}

fn benchmark_parse_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_catalog");

    for size in [10, 50, 100, 500].iter() {
        let input = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parse(black_box(input.as_bytes())))
        });
    }
    group.finish();
}

fn benchmark_bind_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_catalog");

    for size in [10, 100].iter() {
        let input = catalog(*size);
        let doc = parse(input.as_bytes()).unwrap();

        group.bench_with_input(BenchmarkId::new("from_str", size), &input, |b, input| {
            b.iter(|| from_str::<Catalog>(black_box(input)))
        });
        group.bench_with_input(BenchmarkId::new("from_document", size), &doc, |b, doc| {
            b.iter(|| from_document::<Catalog>(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let input = catalog(100);
    c.bench_function("round_trip_catalog", |b| {
        b.iter(|| {
            let doc = parse(black_box(input.as_bytes())).unwrap();
            to_string(&doc)
        })
    });
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_parse_example,
    benchmark_format_example,
    benchmark_parse_catalog,
    benchmark_bind_catalog,
    benchmark_round_trip
);
criterion_main!(benches);
