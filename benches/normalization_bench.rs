//! Normalizer throughput benchmarks.
//!
//! Test logs from large suites run to tens of megabytes, and the trailer sits
//! at the very end, so these measure full scans rather than early exits.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `tap` | TAP trailer extraction behind 10k result lines |
//! | `registry` | Auto-detection cost per dialect through the built-in registry |
//! | `unrecognised` | Worst case: every dialect rejects the input |
//! | `render` | Markdown with every details section on a large JUnit run |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench normalization_bench
//! open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tally_core::config::RenderConfig;
use tally_core::{normalize, render, Format, Registry, Report};

fn tap_log(results: usize) -> String {
    let mut out = String::from("TAP version 13\n");
    for i in 1..=results {
        out.push_str(&format!("ok {i} - case {i}\n  ---\n  duration_ms: 0.{i}\n  ...\n"));
    }
    out.push_str(&format!(
        "1..{results}\n# tests {results}\n# pass {results}\n# fail 0\n# skipped 0\n# duration_ms 4200\n"
    ));
    out
}

fn libtest_log(results: usize) -> String {
    let mut out = format!("running {results} tests\n");
    for i in 0..results {
        out.push_str(&format!("test module::case_{i} ... ok\n"));
    }
    out.push_str(&format!(
        "\ntest result: ok. {results} passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 4.20s\n"
    ));
    out
}

fn go_log(results: usize) -> String {
    let mut out = String::new();
    for i in 0..results {
        out.push_str(&format!("=== RUN   TestCase{i}\n--- PASS: TestCase{i} (0.00s)\n"));
    }
    out.push_str("PASS\nok  \texample.com/bench\t4.200s\n");
    out
}

fn junit_log(results: usize) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\"?>\n<testsuites tests=\"{results}\" failures=\"0\" time=\"4.2\">\n<testsuite name=\"all\" tests=\"{results}\">\n"
    );
    for i in 0..results {
        out.push_str(&format!("  <testcase name=\"case_{i}\" time=\"0.001\"/>\n"));
    }
    out.push_str("</testsuite>\n</testsuites>\n");
    out
}

// ---------------------------------------------------------------------------
// TAP
// ---------------------------------------------------------------------------

fn tap_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("tap");

    for results in [100usize, 10_000] {
        let log = tap_log(results);
        group.throughput(Throughput::Bytes(log.len() as u64));
        group.bench_with_input(BenchmarkId::new("normalize", results), &log, |b, log| {
            b.iter(|| black_box(normalize(black_box(log))))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Registry auto-detection
// ---------------------------------------------------------------------------

fn registry_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let registry = Registry::builtin();

    let logs = [
        ("tap", tap_log(1_000)),
        ("libtest", libtest_log(1_000)),
        ("go", go_log(1_000)),
        ("junit", junit_log(1_000)),
    ];

    for (name, log) in &logs {
        group.throughput(Throughput::Bytes(log.len() as u64));
        group.bench_with_input(BenchmarkId::new("auto", name), log, |b, log| {
            b.iter(|| black_box(registry.normalize(black_box(log))))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Unrecognised output
// ---------------------------------------------------------------------------

fn unrecognised_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("unrecognised");
    let registry = Registry::builtin();

    let log: String = (0..10_000)
        .map(|i| format!("   Compiling crate-{i} v0.1.0\n"))
        .collect();

    group.throughput(Throughput::Bytes(log.len() as u64));
    group.bench_function("build_log_10k_lines", |b| {
        b.iter(|| black_box(registry.normalize(black_box(&log))))
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let log = junit_log(10_000);
    let normalized = Registry::builtin().normalize(&log);
    let config = RenderConfig {
        show_details: true,
        show_passed: true,
        max_lines: 0,
        ..RenderConfig::default()
    };

    group.bench_function("markdown_junit_10k_details", |b| {
        b.iter(|| {
            let report = Report::from_normalized(&normalized, &log);
            black_box(render(&report, Format::Markdown, &config))
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion registration
// ---------------------------------------------------------------------------

criterion_group!(normalization_benches, tap_bench, registry_bench, unrecognised_bench, render_bench);
criterion_main!(normalization_benches);
