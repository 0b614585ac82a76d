// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmarks for view selection, code lookup and friendly-message resolution.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use errview_core::{Fault, KindId, RequestContext, Taxonomy};
use errview_messages::CatalogMessageStore;
use errview_resolver::{DEFAULT_MESSAGE_KEY, ErrorCodeMappings, ExceptionViewResolver};

// ── Helpers ─────────────────────────────────────────────────────────────

/// A chain of `depth` kinds under the root; returns the leaf.
fn deep_taxonomy(depth: usize) -> (Arc<Taxonomy>, KindId) {
    let mut b = Taxonomy::builder();
    let mut parent = KindId::ROOT;
    for i in 0..depth {
        parent = b.register(format!("bench.layer{i}.Failure"), parent).unwrap();
    }
    (Arc::new(b.build()), parent)
}

fn code_table(rows: usize) -> ErrorCodeMappings {
    let mut table = ErrorCodeMappings::new();
    for i in 0..rows {
        table.push(format!("E{i}A, E{i}B, E{i}C"), format!("error/{i}"));
    }
    table
}

fn resolver(taxonomy: Arc<Taxonomy>, rows: usize) -> ExceptionViewResolver {
    let messages = CatalogMessageStore::new()
        .with_message("", DEFAULT_MESSAGE_KEY, "Something went wrong.")
        .with_message("", "E0A", "Code {0} failed.");
    let mut b = ExceptionViewResolver::builder(taxonomy, Arc::new(messages))
        .default_error_view("error/general");
    for i in 0..rows {
        b = b
            .exception_mapping(format!("bench.layer{i}."), format!("error/layer{i}"))
            .error_code_mapping(format!("E{i}A, E{i}B"), format!("error/code{i}"));
    }
    b.build()
}

// ── Benchmarks ──────────────────────────────────────────────────────────

fn bench_code_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_lookup");
    for rows in [4usize, 32, 256] {
        let table = code_table(rows);
        let last = format!(" e{}c ", rows - 1);
        group.bench_with_input(BenchmarkId::new("last_row", rows), &last, |b, code| {
            b.iter(|| black_box(table.find(black_box(code))));
        });
        group.bench_with_input(BenchmarkId::new("miss", rows), &"NOPE", |b, code| {
            b.iter(|| black_box(table.find(black_box(code))));
        });
    }
    group.finish();
}

fn bench_kind_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("kind_distance");
    for depth in [1usize, 8, 32] {
        let (taxonomy, leaf) = deep_taxonomy(depth);
        let r = resolver(Arc::clone(&taxonomy), 1);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| black_box(r.exception_mappings().find(&taxonomy, *leaf)));
        });
    }
    group.finish();
}

fn bench_full_resolution(c: &mut Criterion) {
    let (taxonomy, leaf) = deep_taxonomy(8);
    let r = resolver(taxonomy, 8);
    let req = RequestContext::new("/bench");

    c.bench_function("resolve_fault/kind_match", |b| {
        b.iter(|| black_box(r.resolve_fault(Fault::new(leaf, "boom"), &req)));
    });
    c.bench_function("resolve_fault/code_match_with_args", |b| {
        b.iter(|| {
            let fault = Fault::new(KindId::ROOT, "boom").with_code("E0A").with_arg(7);
            black_box(r.resolve_fault(fault, &req))
        });
    });
    c.bench_function("resolve/foreign_error", |b| {
        b.iter(|| black_box(r.resolve(Box::new(std::fmt::Error), &req)));
    });
}

criterion_group!(
    benches,
    bench_code_lookup,
    bench_kind_distance,
    bench_full_resolution
);
criterion_main!(benches);
