//! Summary renderer — turns a normalised run into text for humans or for the
//! CI platform.
//!
//! | Format | Intended consumer |
//! |--------|-------------------|
//! | `markdown` | Job step summary |
//! | `outputs` | `key=value` outputs file read by later pipeline steps |
//! | `json` | Anything that wants the record verbatim |
//! | `text` | A single log line |
//!
//! An absent duration is always rendered as absent (omitted, `-` or empty),
//! never as `0ms`. Markdown is capped at [`SAFE_SUMMARY_SIZE`] bytes, below
//! the CI platform's limit for one step summary.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::config::RenderConfig;
use crate::error::Error;
use crate::normalizer::Normalized;
use crate::types::{CaseStatus, Status, SummaryRecord, TestCase};

/// Largest markdown summary emitted, in bytes.
pub const SAFE_SUMMARY_SIZE: usize = 1_000_000;

/// Bytes kept free for the truncation notice when capping.
const TRUNCATION_RESERVE: usize = 100;

const MAX_FAILED_LISTED: usize = 20;
const MAX_PASSED_LISTED: usize = 50;
const MAX_MESSAGE_CHARS: usize = 200;

/// Output format for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Format {
    Markdown,
    Outputs,
    Json,
    Text,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Format::Markdown),
            "outputs" => Ok(Format::Outputs),
            "json" => Ok(Format::Json),
            "text" => Ok(Format::Text),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for Format {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Markdown => write!(f, "markdown"),
            Format::Outputs => write!(f, "outputs"),
            Format::Json => write!(f, "json"),
            Format::Text => write!(f, "text"),
        }
    }
}

/// Everything a renderer may show about one run.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub summary: &'a SummaryRecord,
    /// Dialect that produced the summary (`manual` for hand-entered counts).
    pub dialect: Option<&'a str>,
    pub cases: &'a [TestCase],
    /// The raw test output, shown in markdown when details are enabled.
    pub raw: &'a str,
}

impl<'a> Report<'a> {
    /// A bare record with no cases or raw output.
    pub fn new(summary: &'a SummaryRecord) -> Self {
        Self {
            summary,
            dialect: None,
            cases: &[],
            raw: "",
        }
    }

    pub fn from_normalized(normalized: &'a Normalized, raw: &'a str) -> Self {
        Self {
            summary: &normalized.summary,
            dialect: normalized.dialect,
            cases: &normalized.cases,
            raw,
        }
    }
}

/// Render `report` in `format`. The result always ends with a newline.
pub fn render(report: &Report<'_>, format: Format, config: &RenderConfig) -> String {
    match format {
        Format::Markdown => cap_size(markdown(report, config), SAFE_SUMMARY_SIZE),
        Format::Outputs => outputs(report.summary),
        Format::Json => json(report, config),
        Format::Text => text(report.summary),
    }
}

// ---------------------------------------------------------------------------
// markdown
// ---------------------------------------------------------------------------

fn badge(status: Status) -> &'static str {
    match status {
        Status::Passed => ":white_check_mark: **Passed**",
        Status::Failed => ":x: **Failed**",
        Status::Unknown => ":grey_question: **Unknown**",
    }
}

fn markdown(report: &Report<'_>, config: &RenderConfig) -> String {
    let record = report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "## {}\n", config.title);

    if config.badge {
        let _ = writeln!(out, "**Status:** {}\n", badge(record.status()));
    }

    if record.total() > 0 {
        let _ = writeln!(out, "| Metric | Count |");
        let _ = writeln!(out, "|--------|------:|");
        let _ = writeln!(out, "| :white_check_mark: Passed | {} |", record.passed());
        let _ = writeln!(out, "| :x: Failed | {} |", record.failed());
        if record.errors() > 0 {
            let _ = writeln!(out, "| :boom: Errors | {} |", record.errors());
        }
        if record.skipped() > 0 {
            let _ = writeln!(out, "| :fast_forward: Skipped | {} |", record.skipped());
        }
        let _ = writeln!(out, "| **Total** | **{}** |\n", record.total());
        if let Some(d) = record.duration() {
            let _ = writeln!(out, "**Duration:** {}\n", d.human());
        }
        let _ = writeln!(out, "**Pass Rate:** {:.1}%\n", record.pass_rate());
        if let Some(dialect) = report.dialect {
            let _ = writeln!(out, "*Format: {dialect}*\n");
        }
    } else {
        let _ = writeln!(out, "> :warning: No test results found\n");
    }

    if record.status() == Status::Unknown {
        let _ = writeln!(out, "> Test output could not be interpreted; treat this run as inconclusive.\n");
    }

    if config.show_details {
        failed_section(&mut out, report.cases);
    }
    if config.show_passed {
        passed_section(&mut out, report.cases);
    }
    if config.show_details && !report.raw.trim().is_empty() {
        raw_section(&mut out, report.raw, config.max_lines);
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Collapse a multi-line message to one line of at most
/// [`MAX_MESSAGE_CHARS`] characters.
fn short_message(message: &str) -> String {
    let flat = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX_MESSAGE_CHARS {
        let mut cut: String = flat.chars().take(MAX_MESSAGE_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        flat
    }
}

fn failed_section(out: &mut String, cases: &[TestCase]) {
    let failed: Vec<_> = cases.iter().filter(|c| c.status.is_failure()).collect();
    if failed.is_empty() {
        return;
    }
    let _ = writeln!(out, "### Failed Tests\n");
    for case in failed.iter().take(MAX_FAILED_LISTED) {
        let icon = if case.status == CaseStatus::Error { ":boom:" } else { ":x:" };
        let _ = writeln!(out, "- {icon} `{}`", case.display_name());
        if let Some(message) = case.message.as_deref().filter(|m| !m.trim().is_empty()) {
            let _ = writeln!(out, "  - {}", short_message(message));
        }
    }
    if failed.len() > MAX_FAILED_LISTED {
        let _ = writeln!(out, "- ... and {} more failures", failed.len() - MAX_FAILED_LISTED);
    }
    out.push('\n');
}

fn passed_section(out: &mut String, cases: &[TestCase]) {
    let passed: Vec<_> = cases.iter().filter(|c| c.status == CaseStatus::Passed).collect();
    if passed.is_empty() {
        return;
    }
    let _ = writeln!(out, "### Passed Tests\n");
    for case in passed.iter().take(MAX_PASSED_LISTED) {
        let _ = write!(out, "- :white_check_mark: `{}`", case.display_name());
        if let Some(d) = case.duration.filter(|d| d.as_millis() > 0) {
            let _ = write!(out, " ({})", d.human());
        }
        out.push('\n');
    }
    if passed.len() > MAX_PASSED_LISTED {
        let _ = writeln!(out, "- ... and {} more passed", passed.len() - MAX_PASSED_LISTED);
    }
    out.push('\n');
}

/// Fenced raw output, at most `max_lines` lines (0 means all of them).
fn raw_section(out: &mut String, raw: &str, max_lines: usize) {
    let mut fence = String::from("```");
    while raw.contains(fence.as_str()) {
        fence.push('`');
    }
    let total = raw.lines().count();
    let shown = if max_lines == 0 { total } else { total.min(max_lines) };

    let _ = writeln!(out, "### Output\n");
    let _ = writeln!(out, "{fence}");
    for line in raw.lines().take(shown) {
        let _ = writeln!(out, "{line}");
    }
    if shown < total {
        let _ = writeln!(out, "\n... (truncated, showing {shown} of {total} lines)");
    }
    let _ = writeln!(out, "{fence}\n");
}

/// Keep whole lines of `out` until it fits in `limit` bytes, closing an open
/// code fence and appending a notice. Output already within the limit is
/// returned unchanged.
fn cap_size(out: String, limit: usize) -> String {
    if out.len() <= limit {
        return out;
    }
    tracing::warn!(bytes = out.len(), limit, "markdown summary truncated");
    let budget = limit.saturating_sub(TRUNCATION_RESERVE);
    let mut kept = String::new();
    let mut open_fence: Option<&str> = None;
    for line in out.split_inclusive('\n') {
        if kept.len() + line.len() > budget {
            break;
        }
        let trimmed = line.trim_end();
        if trimmed.starts_with("```") && trimmed.bytes().all(|b| b == b'`') {
            open_fence = match open_fence {
                Some(f) if f == trimmed => None,
                None => Some(trimmed),
                other => other,
            };
        }
        kept.push_str(line);
    }
    if let Some(fence) = open_fence {
        let _ = writeln!(kept, "{fence}");
    }
    let _ = writeln!(kept, "\n> :warning: Output truncated due to size limits");
    kept
}

// ---------------------------------------------------------------------------
// outputs / json / text
// ---------------------------------------------------------------------------

fn outputs(record: &SummaryRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "status={}", record.status());
    let _ = writeln!(out, "total={}", record.total());
    let _ = writeln!(out, "passed={}", record.passed());
    let _ = writeln!(out, "failed={}", record.failed());
    let _ = writeln!(out, "skipped={}", record.skipped());
    let _ = writeln!(out, "errors={}", record.errors());
    match record.duration() {
        Some(d) => {
            let _ = writeln!(out, "duration={d}");
        }
        None => {
            let _ = writeln!(out, "duration=");
        }
    }
    let _ = writeln!(out, "pass_rate={:.1}", record.pass_rate());
    out
}

/// The `json` document: the record's fields plus context.
#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    #[serde(flatten)]
    summary: &'a SummaryRecord,
    pass_rate: f64,
    format: Option<&'a str>,
    cases: &'a [TestCase],
}

fn json(report: &Report<'_>, config: &RenderConfig) -> String {
    let document = JsonDocument {
        title: &config.title,
        summary: report.summary,
        pass_rate: (report.summary.pass_rate() * 10.0).round() / 10.0,
        format: report.dialect,
        cases: report.cases,
    };
    let mut out = serde_json::to_string_pretty(&document).expect("summary document must serialize to JSON");
    out.push('\n');
    out
}

fn text(record: &SummaryRecord) -> String {
    let mut out = format!(
        "{}: {} passed, {} failed, {} skipped of {}",
        record.status(),
        record.passed(),
        record.failed(),
        record.skipped(),
        record.total(),
    );
    if let Some(d) = record.duration() {
        let _ = write!(out, " ({d})");
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
