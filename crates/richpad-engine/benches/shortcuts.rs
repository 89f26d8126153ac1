use criterion::{Criterion, criterion_group, criterion_main};
use richpad_engine::{Document, match_shortcut, plan_return};
mod common;

fn bench_shortcut_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortcuts");

    let lines = common::generate_lines(100);

    group.bench_function("match_shortcut", |b| {
        b.iter(|| {
            for line in &lines {
                std::hint::black_box(match_shortcut(std::hint::black_box(line)));
            }
        });
    });

    let doc = Document::from_plain_text("*** underlined heading text");
    group.bench_function("plan_return", |b| {
        b.iter(|| std::hint::black_box(plan_return(std::hint::black_box(&doc))));
    });

    group.bench_function("apply_return_plan", |b| {
        b.iter(|| {
            let mut d = doc.clone();
            for cmd in plan_return(&d).commands {
                std::hint::black_box(d.apply(cmd));
            }
            std::hint::black_box(d);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_shortcut_matching);
criterion_main!(benches);
