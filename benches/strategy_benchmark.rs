//! Strategy benchmark: Measure the cost of one reveal step and of a full reveal.
//!
//! Target: a reveal step stays well under 1µs for typical response sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trickle::engine::common_prefix_len;
use trickle::{RevealMode, RevealStrategy};

fn sample(len: usize) -> String {
    let words = ["stream", "the", "<b>reply</b>", "héllo", "token", "a", "cadence", "✓"];
    let mut text = String::with_capacity(len + 16);
    let mut i = 0;
    while text.len() < len {
        text.push_str(words[i % words.len()]);
        text.push(' ');
        i += 1;
    }
    text
}

fn reveal_all(strategy: &dyn RevealStrategy, text: &str) -> usize {
    let mut cursor = 0;
    let mut emitted = 0;
    while cursor < text.len() {
        cursor = strategy.stream(text, cursor, &mut |f: &str| emitted += f.len());
    }
    emitted
}

fn strategy_single_step(c: &mut Criterion) {
    let text = sample(4_096);
    let mid = text.len() / 2;
    let mid = (mid..text.len()).find(|&i| text.is_char_boundary(i)).unwrap_or(0);

    for mode in RevealMode::ALL {
        let strategy = mode.strategy();
        c.bench_function(&format!("step_{mode}_mid_4k"), |b| {
            b.iter(|| {
                strategy.stream(black_box(&text), black_box(mid), &mut |f: &str| {
                    black_box(f);
                })
            });
        });
    }
}

fn strategy_full_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_reveal");

    for size in [256, 4_096] {
        let text = sample(size);
        for mode in [RevealMode::Character, RevealMode::Word] {
            let strategy = mode.strategy();
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), &text, |b, text| {
                b.iter(|| reveal_all(strategy.as_ref(), black_box(text)));
            });
        }
    }

    group.finish();
}

fn prefix_divergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("common_prefix");

    for size in [256, 4_096, 65_536] {
        let base = sample(size);
        let mut edited = base.clone();
        edited.push_str("tail that only the new text has");
        group.bench_with_input(BenchmarkId::new("append_only", size), &size, |b, _| {
            b.iter(|| common_prefix_len(black_box(&base), black_box(&edited)));
        });

        let early = format!("X{}", &base[1..]);
        group.bench_with_input(BenchmarkId::new("diverge_at_start", size), &size, |b, _| {
            b.iter(|| common_prefix_len(black_box(&base), black_box(&early)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    strategy_single_step,
    strategy_full_reveal,
    prefix_divergence,
);
criterion_main!(benches);
