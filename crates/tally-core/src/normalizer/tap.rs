//! TAP trailer dialect.
//!
//! Node's `node:test` runner (and most TAP producers) finish with a block of
//! `# <label> <count>` lines:
//!
//! ```text
//! # tests 56
//! # pass 54
//! # fail 1
//! # cancelled 0
//! # skipped 1
//! # todo 0
//! # duration_ms 312
//! ```
//!
//! Labels are matched only at the start of a line, followed by spaces or tabs
//! and an integer. For each label the first matching line wins and only its
//! leading run of digits is read.
//!
//! Unindented `ok N - name` / `not ok N - name` test points are listed as
//! cases; a `# SKIP` or `# TODO` directive marks the point skipped.

use std::sync::LazyLock;

use regex::Regex;

use super::{parse_count, Dialect};
use crate::types::{CaseStatus, Counts, TestCase};

static GATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# tests[ \t]+\d").expect("tap gate regex"));
static TESTS_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("tests"));
static PASS_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("pass"));
static FAIL_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("fail"));
static SKIPPED_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("skipped"));
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("duration_ms"));
static POINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(not ok|ok)\b[ \t]*\d*[ \t]*-?(.*)$").expect("tap point regex"));

fn label_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?m)^# {label}[ \t]+(\d+)")).expect("tap label regex")
}

/// First matching line for `re`, its leading integer parsed.
fn first_count(re: &Regex, label: &str, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    parse_count(label, caps.get(1)?.as_str())
}

fn test_point(ok: bool, rest: &str) -> TestCase {
    let (name, directive) = match rest.split_once(" # ") {
        Some((name, directive)) => (name, directive.trim_start()),
        None => (rest, ""),
    };
    let directive = directive.get(..4).unwrap_or("").to_ascii_uppercase();
    let status = if directive == "SKIP" || directive == "TODO" {
        CaseStatus::Skipped
    } else if ok {
        CaseStatus::Passed
    } else {
        CaseStatus::Failed
    };
    TestCase::new(name.trim(), status)
}

/// The TAP summary-trailer dialect. Gate line: `# tests <N>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tap;

impl Dialect for Tap {
    fn name(&self) -> &'static str {
        "tap"
    }

    fn detect(&self, text: &str) -> bool {
        GATE_RE.is_match(text)
    }

    fn extract(&self, text: &str) -> Counts {
        Counts {
            passed: first_count(&PASS_RE, "pass", text),
            failed: first_count(&FAIL_RE, "fail", text),
            skipped: first_count(&SKIPPED_RE, "skipped", text),
            total: first_count(&TESTS_RE, "tests", text),
            duration_ms: first_count(&DURATION_RE, "duration_ms", text),
            ..Counts::default()
        }
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        POINT_RE
            .captures_iter(text)
            .map(|caps| test_point(&caps[1] == "ok", caps[2].trim_end_matches('\r')))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
