use criterion::{Criterion, criterion_group, criterion_main};
use richpad_engine::{RawContentState, convert_from_raw, convert_to_raw};
mod common;

fn bench_raw_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw");
    group.sample_size(10);

    let doc = common::generate_styled_document(500);
    let raw = convert_to_raw(&doc);
    let json = raw.to_json().expect("document encodes");

    group.bench_function("convert_to_raw", |b| {
        b.iter(|| std::hint::black_box(convert_to_raw(std::hint::black_box(&doc))));
    });

    group.bench_function("convert_from_raw", |b| {
        b.iter(|| std::hint::black_box(convert_from_raw(std::hint::black_box(&raw))));
    });

    group.bench_function("parse_json", |b| {
        b.iter(|| std::hint::black_box(RawContentState::from_json(std::hint::black_box(&json))));
    });

    group.finish();
}

criterion_group!(benches, bench_raw_conversion);
criterion_main!(benches);
