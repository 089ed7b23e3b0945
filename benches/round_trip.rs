//! This bench test assembles a large technical-demand block into editor text
//! and splits the text back into native lines.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use techreq::{
    NumberingMode, RequirementLine,
    domain::{aggregate, split},
};

/// Generates a block of numbered requirements with continuation lines
fn native_lines() -> Vec<RequirementLine> {
    (1..=500)
        .flat_map(|i| {
            [
                RequirementLine::numbered(format!("Неуказанные предельные отклонения {i}")),
                RequirementLine::continuation("размеров: H14, h14, ±IT14/2."),
                RequirementLine::continuation(""),
            ]
        })
        .collect()
}

fn round_trip(c: &mut Criterion) {
    let lines = native_lines();
    let text = aggregate(&lines).to_text();

    c.bench_function("aggregate", |b| b.iter(|| aggregate(&lines)));
    c.bench_function("split manual", |b| {
        b.iter(|| split(&text, NumberingMode::Manual));
    });
    c.bench_function("split auto", |b| b.iter(|| split(&text, NumberingMode::Auto)));
}

criterion_group!(benches, round_trip);
criterion_main!(benches);
