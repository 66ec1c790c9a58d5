//! Generic fallback: loose, case-insensitive `N passed` / `failed: N` phrases.
//!
//! Not part of auto-detection. Any output with a number next to one of the
//! words is claimed, so it only runs when selected with `dialect = "generic"`
//! or `generic_fallback = true`.
//!
//! For each counter the first phrase wins. `errors` are added into failed.
//! Without a `N total` phrase the total is the sum of the counters.

use std::sync::LazyLock;

use regex::Regex;

use super::{parse_count, seconds_to_millis, Dialect};
use crate::types::Counts;

static PASSED_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex("passed"));
static FAILED_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex("failed"));
static SKIPPED_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex("skipped"));
static ERRORS_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex("errors?"));
static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s+(?:tests?\s+)?total\b").expect("generic total regex")
});
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:time|duration|took):?\s*([0-9]+(?:\.[0-9]+)?)\s*s\b").expect("generic duration regex")
});

/// `12 passed`, `12 tests passed` or `passed: 12`.
fn phrase_regex(word: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\b(?:(\d+)\s+(?:tests?\s+)?{word}\b|{word}:\s*(\d+))"
    ))
    .expect("generic phrase regex")
}

fn first(re: &Regex, label: &str, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    parse_count(label, digits.as_str())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Dialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn detect(&self, text: &str) -> bool {
        [&PASSED_RE, &FAILED_RE, &SKIPPED_RE, &ERRORS_RE]
            .into_iter()
            .any(|re| re.is_match(text))
    }

    fn extract(&self, text: &str) -> Counts {
        let errors = first(&ERRORS_RE, "errors", text);
        let failed = match (first(&FAILED_RE, "failed", text), errors) {
            (None, None) => None,
            (f, e) => Some(f.unwrap_or(0).saturating_add(e.unwrap_or(0))),
        };
        Counts {
            passed: first(&PASSED_RE, "passed", text),
            failed,
            skipped: first(&SKIPPED_RE, "skipped", text),
            errors,
            total: first(&TOTAL_RE, "total", text),
            duration_ms: DURATION_RE
                .captures(text)
                .and_then(|caps| seconds_to_millis("duration", &caps[1])),
        }
        .with_derived_total()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
