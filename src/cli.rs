//! Command-line interface definition.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_core::Format;

/// Outputs file the CI platform reads `key=value` step outputs from.
pub const OUTPUTS_ENV: &str = "GITHUB_OUTPUT";
/// Markdown file the CI platform shows as the job step summary.
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Normalise test-runner output into a pass/fail summary")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: ./tally.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: markdown, outputs, json or text.
    #[arg(long, global = true)]
    pub format: Option<Format>,

    /// Pin a dialect (tap, libtest, go, jest, junit, pytest-json, json,
    /// generic) instead of auto-detecting.
    #[arg(long, global = true)]
    pub dialect: Option<String>,

    /// Append `key=value` outputs to this file [default: $GITHUB_OUTPUT].
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Append the markdown summary to this file [default: $GITHUB_STEP_SUMMARY].
    #[arg(long, global = true)]
    pub step_summary: Option<PathBuf>,

    /// Summary heading.
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Leave out the status line under the heading.
    #[arg(long, global = true)]
    pub no_badge: bool,

    /// List failed tests and include the raw output in markdown.
    #[arg(long, global = true)]
    pub show_details: bool,

    /// List passed tests in markdown.
    #[arg(long, global = true)]
    pub show_passed: bool,

    /// Raw output lines shown with --show-details (0 for all).
    #[arg(long, global = true)]
    pub max_lines: Option<usize>,

    /// Always exit 0 after rendering, whatever the gate decides.
    #[arg(long, global = true)]
    pub no_gate: bool,

    /// Log at debug level to stderr (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub debug: bool,
}

impl Cli {
    /// Fill `--output` and `--step-summary` from the CI environment when they
    /// were not given. `lookup` is normally [`std::env::var_os`].
    pub fn with_ci_env(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let from_env = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        if self.output.is_none() {
            self.output = from_env(OUTPUTS_ENV);
        }
        if self.step_summary.is_none() {
            self.step_summary = from_env(STEP_SUMMARY_ENV);
        }
        self
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize saved test output. Reads stdin when FILE is omitted or `-`.
    Summarize {
        file: Option<PathBuf>,
    },
    /// Run a test command, stream its output to stderr, then summarize it.
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Summarize counts given on the command line.
    Counts(ManualCounts),
}

/// Hand-entered results. Errors count as failures; the total is the sum.
#[derive(Debug, Clone, Args)]
pub struct ManualCounts {
    #[arg(long, default_value_t = 0)]
    pub passed: u64,
    #[arg(long, default_value_t = 0)]
    pub failed: u64,
    #[arg(long, default_value_t = 0)]
    pub skipped: u64,
    #[arg(long, default_value_t = 0)]
    pub errors: u64,
    /// Run time in seconds.
    #[arg(long)]
    pub duration: Option<f64>,
}

impl ManualCounts {
    pub fn to_counts(&self) -> anyhow::Result<tally_core::Counts> {
        let duration_ms = match self.duration {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Some((secs * 1000.0).round() as u64),
            Some(secs) => anyhow::bail!("--duration must be a non-negative number of seconds, got {secs}"),
            None => None,
        };
        Ok(tally_core::Counts {
            passed: Some(self.passed),
            failed: Some(self.failed.saturating_add(self.errors)),
            skipped: Some(self.skipped),
            errors: Some(self.errors),
            total: None,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tally").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn ci_env_fills_missing_paths() {
        let cli = parse(&["summarize", "out.tap"]).with_ci_env(|key| match key {
            OUTPUTS_ENV => Some("/ci/outputs".into()),
            STEP_SUMMARY_ENV => Some("/ci/summary.md".into()),
            _ => None,
        });
        assert_eq!(cli.output, Some(PathBuf::from("/ci/outputs")));
        assert_eq!(cli.step_summary, Some(PathBuf::from("/ci/summary.md")));
    }

    #[test]
    fn flags_win_over_ci_env() {
        let cli = parse(&["summarize", "--output", "mine.txt"])
            .with_ci_env(|_| Some("/ci/file".into()));
        assert_eq!(cli.output, Some(PathBuf::from("mine.txt")));
        assert_eq!(cli.step_summary, Some(PathBuf::from("/ci/file")));
    }

    #[test]
    fn empty_ci_env_is_ignored() {
        let cli = parse(&["summarize"]).with_ci_env(|_| Some(OsString::new()));
        assert_eq!(cli.output, None);
        assert_eq!(cli.step_summary, None);
    }

    #[test]
    fn manual_errors_are_failures() {
        let cli = parse(&["counts", "--passed", "8", "--errors", "2", "--duration", "1.25"]);
        let Command::Counts(manual) = cli.command else {
            panic!("expected counts");
        };
        let counts = manual.to_counts().unwrap();
        assert_eq!(counts.failed, Some(2));
        assert_eq!(counts.errors, Some(2));
        assert_eq!(counts.duration_ms, Some(1250));
    }

    #[test]
    fn negative_manual_duration_is_rejected() {
        let cli = parse(&["counts", "--passed", "1", "--duration=-3"]);
        let Command::Counts(manual) = cli.command else {
            panic!("expected counts");
        };
        assert!(manual.to_counts().is_err());
    }
}
