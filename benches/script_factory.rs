//! Script factory benchmarks.
//!
//! Compares a cold build (load + substitute) with a cached lookup.
//!
//! Run with: cargo bench --bench script_factory
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use user_script_factory::{DomainUserScript, ScriptFactory, ScriptType};

// ============================================================================
// Benchmark Parameters
// ============================================================================

fn script_types() -> Vec<(&'static str, ScriptType)> {
    vec![
        ("nacl", ScriptType::Nacl),
        ("farbling", ScriptType::farbling_protection("example.com")),
        (
            "youtube",
            ScriptType::domain(DomainUserScript::YoutubeAdBlock),
        ),
        (
            "search",
            ScriptType::domain(DomainUserScript::BraveSearchHelper),
        ),
    ]
}

// ============================================================================
// Benchmark: Cold Build
// ============================================================================

fn bench_cold_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_build");
    let factory = ScriptFactory::new();

    for (name, script_type) in script_types() {
        group.bench_with_input(BenchmarkId::new("build", name), &script_type, |b, st| {
            b.iter(|| {
                factory.clear_all();
                black_box(factory.build(st))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Cached Build
// ============================================================================

fn bench_cached_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_build");
    let factory = ScriptFactory::new();

    for (name, script_type) in script_types() {
        let _ = factory.build(&script_type);
        group.bench_with_input(BenchmarkId::new("build", name), &script_type, |b, st| {
            b.iter(|| black_box(factory.build(st)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Many Farbling Domains
// ============================================================================

fn bench_farbling_domains(c: &mut Criterion) {
    let factory = ScriptFactory::new();
    let domains: Vec<_> = (0..256)
        .map(|i| ScriptType::farbling_protection(format!("site{i}.example")))
        .collect();

    c.bench_function("farbling_256_domains", |b| {
        b.iter(|| {
            factory.clear_all();
            for script_type in &domains {
                let _ = black_box(factory.build(script_type));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_cold_build,
    bench_cached_build,
    bench_farbling_domains
);
criterion_main!(benches);
