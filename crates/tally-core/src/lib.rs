//! tally-core — test-output normalisation for CI pipelines.
//!
//! This crate holds the pure, synchronous half of tally: parsing raw
//! test-runner output into a [`SummaryRecord`], rendering that record for a
//! step summary or an outputs file, and deciding whether it passes a gate.
//!
//! # Pipeline
//!
//! ```text
//! RawOutput ──► Registry (tap | libtest | go | jest | junit | pytest-json | json)
//!                   │
//!                   ▼
//!              Normalized { dialect, SummaryRecord, cases }
//!                   │
//!       render ◄────┴────► gate
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod normalizer;
pub mod render;
pub mod types;

pub use error::Error;
pub use gate::Verdict;
pub use normalizer::{hint_for_path, normalize, Dialect, Normalized, Registry};
pub use render::{render, Format, Report};
pub use types::{CaseStatus, Counts, DurationMs, RawOutput, Status, SummaryRecord, TestCase};
