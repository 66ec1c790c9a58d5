//! Normalizer — turns raw test-runner output into a [`SummaryRecord`].
//!
//! Each supported output format is a [`Dialect`]: a detection gate plus a
//! field extractor producing partial [`Counts`]. A [`Registry`] tries its
//! dialects in order and the first whose gate matches does the extraction.
//!
//! Normalization never fails. Output that no dialect recognises yields
//! [`SummaryRecord::unknown`], and a field a dialect cannot read falls back to
//! its default.
//!
//! Detection order for [`Registry::builtin`]:
//!
//! ```text
//! tap → libtest → go → jest → junit → pytest-json → json
//! ```
//!
//! [`Generic`] is not part of it: it reads loose `N passed` phrases and would
//! claim output that merely mentions numbers. It is opt-in, either pinned or
//! as a last-resort fallback.

mod generic;
mod go;
mod jest;
mod json;
mod junit;
mod libtest;
mod tap;

pub use generic::Generic;
pub use go::GoTest;
pub use jest::JestText;
pub use json::{JsonReport, PytestJson};
pub use junit::Junit;
pub use libtest::Libtest;
pub use tap::Tap;

use std::path::Path;

use crate::config::NormalizerConfig;
use crate::error::Error;
use crate::types::{Counts, SummaryRecord, TestCase};

/// A recognised test-output format.
pub trait Dialect: Send + Sync {
    /// Short lowercase identifier used in configuration (`tap`, `junit`, …).
    fn name(&self) -> &'static str;

    /// Whether `text` carries this dialect's summary marker. Extraction is
    /// only attempted when this returns `true`.
    fn detect(&self, text: &str) -> bool;

    /// Extract whatever counters are present. Missing fields stay `None`.
    fn extract(&self, text: &str) -> Counts;

    /// Individual tests listed in the output, for the details sections of a
    /// summary. Dialects that only see a trailer return nothing.
    fn cases(&self, _text: &str) -> Vec<TestCase> {
        Vec::new()
    }

    /// Gate, extract and merge with defaults.
    fn normalize(&self, text: &str) -> SummaryRecord {
        if self.detect(text) {
            SummaryRecord::from_counts(self.extract(text))
        } else {
            SummaryRecord::unknown()
        }
    }
}

/// Normalize TAP output (`# tests N` / `# pass N` / … trailer lines).
///
/// Without a `# tests <N>` line at the start of some line, nothing is
/// extracted and the record is all-zero with status `unknown`.
pub fn normalize(raw: &str) -> SummaryRecord {
    Tap.normalize(raw)
}

/// Result of [`Registry::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Name of the dialect that recognised the output, if any.
    pub dialect: Option<&'static str>,
    pub summary: SummaryRecord,
    pub cases: Vec<TestCase>,
}

impl Normalized {
    /// A summary that did not come from parsing, e.g. counts given on the
    /// command line.
    pub fn from_counts(dialect: &'static str, counts: Counts) -> Self {
        Self {
            dialect: Some(dialect),
            summary: SummaryRecord::from_counts(counts.with_derived_total()),
            cases: Vec::new(),
        }
    }

    fn unrecognised() -> Self {
        Self {
            dialect: None,
            summary: SummaryRecord::unknown(),
            cases: Vec::new(),
        }
    }
}

/// Dialects to try first for a report file, judged by its extension.
pub fn hint_for_path(path: &Path) -> &'static [&'static str] {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xml") => &["junit"],
        Some(ext) if ext.eq_ignore_ascii_case("json") => &["pytest-json", "json"],
        _ => &[],
    }
}

/// An ordered set of dialects. Earlier dialects take precedence.
pub struct Registry {
    dialects: Vec<Box<dyn Dialect>>,
}

impl Registry {
    /// A registry with no dialects. Everything normalizes to `unknown`.
    pub fn empty() -> Self {
        Self { dialects: Vec::new() }
    }

    /// All auto-detected dialects, in detection order.
    pub fn builtin() -> Self {
        Self::empty()
            .with(Box::new(Tap))
            .with(Box::new(Libtest))
            .with(Box::new(GoTest))
            .with(Box::new(JestText))
            .with(Box::new(Junit))
            .with(Box::new(PytestJson))
            .with(Box::new(JsonReport))
    }

    /// Every dialect that can be selected by name: the built-ins plus the
    /// generic fallback.
    fn selectable() -> Self {
        Self::builtin().with(Box::new(Generic))
    }

    /// Append a dialect after the existing ones.
    pub fn with(mut self, dialect: Box<dyn Dialect>) -> Self {
        self.dialects.push(dialect);
        self
    }

    /// Restrict to the single dialect called `name`.
    pub fn only(name: &str) -> Result<Self, Error> {
        let mut all = Self::selectable();
        match all.dialects.iter().position(|d| d.name() == name) {
            Some(idx) => {
                let dialect = all.dialects.swap_remove(idx);
                Ok(Self::empty().with(dialect))
            }
            None => Err(Error::UnknownDialect {
                name: name.to_string(),
                known: all.names().collect::<Vec<_>>().join(", "),
            }),
        }
    }

    /// Build the registry selected by `[normalizer]`.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self, Error> {
        match config.dialect.as_str() {
            "auto" if config.generic_fallback => Ok(Self::builtin().with(Box::new(Generic))),
            "auto" => Ok(Self::builtin()),
            name => Self::only(name),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dialects.iter().map(|d| d.name())
    }

    pub fn normalize(&self, raw: &str) -> Normalized {
        self.normalize_preferring(raw, &[])
    }

    /// Like [`Registry::normalize`], but dialects named in `preferred` are
    /// tried before the rest. Names not in this registry are ignored.
    pub fn normalize_preferring(&self, raw: &str, preferred: &[&str]) -> Normalized {
        let first = preferred
            .iter()
            .filter_map(|name| self.dialects.iter().find(|d| d.name() == *name));
        let rest = self.dialects.iter().filter(|d| !preferred.contains(&d.name()));
        match first.chain(rest).find(|d| d.detect(raw)) {
            Some(dialect) => {
                let summary = SummaryRecord::from_counts(dialect.extract(raw));
                let cases = dialect.cases(raw);
                tracing::debug!(
                    dialect = dialect.name(),
                    status = %summary.status(),
                    total = summary.total(),
                    cases = cases.len(),
                    "normalized test output"
                );
                Normalized {
                    dialect: Some(dialect.name()),
                    summary,
                    cases,
                }
            }
            None => {
                tracing::debug!(bytes = raw.len(), "no dialect recognised test output");
                Normalized::unrecognised()
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parse a captured run of ASCII digits, logging and discarding values that
/// overflow `u64`.
pub(crate) fn parse_count(label: &str, digits: &str) -> Option<u64> {
    match digits.parse::<u64>() {
        Ok(n) => Some(n),
        Err(err) => {
            tracing::warn!(label, digits, %err, "ignoring unparseable counter");
            None
        }
    }
}

/// Convert a decimal number of seconds to whole milliseconds.
pub(crate) fn seconds_to_millis(label: &str, seconds: &str) -> Option<u64> {
    match seconds.trim().parse::<f64>() {
        Ok(secs) => float_seconds_to_millis(label, secs),
        Err(_) => {
            tracing::warn!(label, seconds, "ignoring unparseable duration");
            None
        }
    }
}

pub(crate) fn float_seconds_to_millis(label: &str, secs: f64) -> Option<u64> {
    if secs.is_finite() && secs >= 0.0 {
        Some((secs * 1000.0).round() as u64)
    } else {
        tracing::warn!(label, secs, "ignoring negative or non-finite duration");
        None
    }
}

/// Add `value` into `slot`, leaving it `None` only if nothing was ever added.
pub(crate) fn add(slot: &mut Option<u64>, value: Option<u64>) {
    if let Some(v) = value {
        *slot = Some(slot.unwrap_or(0).saturating_add(v));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
