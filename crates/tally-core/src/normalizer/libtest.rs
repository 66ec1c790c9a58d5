//! Rust libtest dialect.
//!
//! `cargo test` prints one footer per test binary:
//!
//! ```text
//! test result: FAILED. 54 passed; 1 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.31s
//! ```
//!
//! All footers in the output are summed. `ignored` counts as skipped.
//! Individual `test <name> ... ok|FAILED|ignored` lines become cases.

use std::sync::LazyLock;

use regex::Regex;

use super::{add, parse_count, seconds_to_millis, Dialect};
use crate::types::{CaseStatus, Counts, TestCase};

static GATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^test result: ").expect("libtest gate regex"));
static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^test result: \w+\. (\d+) passed; (\d+) failed; (\d+) ignored; \d+ measured; \d+ filtered out(?:; finished in ([0-9.]+)s)?",
    )
    .expect("libtest result regex")
});
static CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^test (\S+)(?: - should panic)? \.\.\. (ok|FAILED|ignored)").expect("libtest case regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Libtest;

impl Dialect for Libtest {
    fn name(&self) -> &'static str {
        "libtest"
    }

    fn detect(&self, text: &str) -> bool {
        GATE_RE.is_match(text)
    }

    fn extract(&self, text: &str) -> Counts {
        let mut counts = Counts::default();
        for caps in RESULT_RE.captures_iter(text) {
            let passed = parse_count("passed", &caps[1]);
            let failed = parse_count("failed", &caps[2]);
            let ignored = parse_count("ignored", &caps[3]);
            add(&mut counts.passed, passed);
            add(&mut counts.failed, failed);
            add(&mut counts.skipped, ignored);
            for n in [passed, failed, ignored] {
                add(&mut counts.total, n);
            }
            if let Some(secs) = caps.get(4) {
                add(&mut counts.duration_ms, seconds_to_millis("finished in", secs.as_str()));
            }
        }
        counts
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        CASE_RE
            .captures_iter(text)
            .map(|caps| {
                let status = match &caps[2] {
                    "ok" => CaseStatus::Passed,
                    "FAILED" => CaseStatus::Failed,
                    _ => CaseStatus::Skipped,
                };
                TestCase::new(&caps[1], status)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
