//! Benchmarks for validation and compilation.

use std::sync::Arc;

use contractflow::compile::{BlueprintCompiler, PayloadCompiler};
use contractflow::registry::{catalog::ids, Registry};
use contractflow::testing::RecordBuilder;
use contractflow::validation::ValidationEngine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn engine_benchmark(c: &mut Criterion) {
    let Ok(registry) = Registry::builtin() else {
        return;
    };
    let registry = Arc::new(registry);
    let record = RecordBuilder::fixed_term().build();

    let engine = ValidationEngine::new(Arc::clone(&registry));
    c.bench_function("validate_fixed_term", |b| {
        b.iter(|| engine.validate(black_box(ids::OMAN_FIXED_TERM), black_box(&record)));
    });

    let payloads = PayloadCompiler::new(Arc::clone(&registry));
    c.bench_function("compile_payload_fixed_term", |b| {
        b.iter(|| payloads.compile(black_box(ids::OMAN_FIXED_TERM), black_box(&record)));
    });

    let blueprints = BlueprintCompiler::new(Arc::clone(&registry));
    c.bench_function("compile_blueprint_fixed_term", |b| {
        b.iter(|| blueprints.compile_for_type(black_box(ids::OMAN_FIXED_TERM)));
    });
}

criterion_group!(benches, engine_benchmark);
criterion_main!(benches);
