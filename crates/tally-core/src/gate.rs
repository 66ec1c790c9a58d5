//! Test gate — decides whether a normalised run lets the pipeline continue.

use crate::config::GateConfig;
use crate::types::{Status, SummaryRecord};

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail { reason: String },
    /// The output could not be interpreted, so nothing can be claimed.
    Inconclusive,
}

impl Verdict {
    /// Process exit code for this verdict: 0, 1 or 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail { .. } => 1,
            Verdict::Inconclusive => 2,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail { reason } => write!(f, "fail: {reason}"),
            Verdict::Inconclusive => write!(f, "inconclusive: test output could not be interpreted"),
        }
    }
}

/// Apply the gate to `record`.
pub fn evaluate(record: &SummaryRecord, config: &GateConfig) -> Verdict {
    let verdict = if record.failed() > config.max_failed {
        Verdict::Fail {
            reason: format!(
                "{} failed test(s), at most {} allowed",
                record.failed(),
                config.max_failed
            ),
        }
    } else if record.status() == Status::Unknown && !config.allow_unknown {
        Verdict::Inconclusive
    } else {
        Verdict::Pass
    };
    tracing::debug!(%verdict, status = %record.status(), failed = record.failed(), "gate evaluated");
    verdict
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
