//! Translation throughput on synthetic programs.
//!
//! Measures:
//! 1. Straight-line arithmetic and segment traffic
//! 2. Comparison-heavy code (label allocation)
//! 3. Call-heavy multi-unit programs (function cache + frames)

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hackvm::{translate_units, Bootstrap, SourceUnit, TranslateOptions};

/// Straight-line code cycling through every push/pop segment.
fn synthetic_arith(n: usize) -> String {
    let mut src = String::with_capacity(n * 16);
    for i in 0..n {
        let line = match i % 8 {
            0 => format!("push constant {}", i % 40000),
            1 => format!("pop local {}", i % 16),
            2 => format!("push argument {}", i % 4),
            3 => "add".to_string(),
            4 => format!("pop static {}", i % 10),
            5 => format!("push temp {}", i % 8),
            6 => "neg".to_string(),
            _ => "pop that 0".to_string(),
        };
        src.push_str(&line);
        src.push('\n');
    }
    src
}

fn synthetic_compare(n: usize) -> String {
    let ops = ["eq", "gt", "lt"];
    let mut src = String::new();
    for i in 0..n {
        src.push_str(&format!(
            "push constant {}\npush constant {}\n{}\npop temp 0\n",
            i,
            n - i,
            ops[i % 3]
        ));
    }
    src
}

/// `units` files, each defining `funcs` functions that call their neighbour.
fn synthetic_calls(units: usize, funcs: usize) -> Vec<SourceUnit> {
    (0..units)
        .map(|u| {
            let mut src = String::new();
            for f in 0..funcs {
                src.push_str(&format!(
                    "function M{}.f{} 2\npush argument 0\ncall M{}.f{} 1\nreturn\n",
                    u,
                    f,
                    (u + 1) % units,
                    (f + 1) % funcs
                ));
            }
            SourceUnit::new(&format!("M{}", u), &src)
        })
        .collect()
}

fn bench_arith(c: &mut Criterion) {
    let small = [SourceUnit::new("Arith", &synthetic_arith(1_000))];
    let large = [SourceUnit::new("Arith", &synthetic_arith(20_000))];
    let options = TranslateOptions::default();

    let mut group = c.benchmark_group("arith");
    group.bench_function("1k_commands", |b| {
        b.iter(|| translate_units(black_box(&small), &options))
    });
    group.bench_function("20k_commands", |b| {
        b.iter(|| translate_units(black_box(&large), &options))
    });
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let units = [SourceUnit::new("Cmp", &synthetic_compare(2_000))];
    let options = TranslateOptions {
        annotate: false,
        ..TranslateOptions::default()
    };
    c.bench_function("compare_2k", |b| {
        b.iter(|| translate_units(black_box(&units), &options))
    });
}

fn bench_calls(c: &mut Criterion) {
    let units = synthetic_calls(20, 50);
    let options = TranslateOptions {
        bootstrap: Bootstrap::Always,
        entry: "M0.f0".to_string(),
        ..TranslateOptions::default()
    };
    c.bench_function("calls_20x50", |b| {
        b.iter(|| translate_units(black_box(&units), &options))
    });
}

criterion_group!(benches, bench_arith, bench_compare, bench_calls);
criterion_main!(benches);
