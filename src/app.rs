//! One tally invocation: read a feed, normalize, render, gate.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tally_core::config::{Config, RenderConfig};
use tally_core::gate::{self, Verdict};
use tally_core::render::{self, Format, Report};
use tally_core::{hint_for_path, Normalized, Registry, Status};
use tally_feeds::Feed;

use crate::cli::{Cli, Command};

/// Run `cli` and return the process exit code. The rendered summary goes to
/// `out`; streamed command output and gate messages go to stderr.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<i32> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    apply_overrides(cli, &mut config);

    let registry = Registry::from_config(&config.normalizer)?;

    let (feed, hint) = match &cli.command {
        Command::Summarize { file } => {
            let feed = Feed::from_path_arg(file.clone());
            let hint = match &feed {
                Feed::File(path) => hint_for_path(path),
                _ => &[],
            };
            (Some(feed), hint)
        }
        Command::Run { command } => {
            let (program, args) = command
                .split_first()
                .context("`run` needs a command to execute")?;
            let feed = Feed::Command {
                program: program.clone(),
                args: args.to_vec(),
                echo: true,
            };
            (Some(feed), &[][..])
        }
        Command::Counts(_) => (None, &[][..]),
    };

    let capture = match &feed {
        Some(feed) => Some(feed.read().await?),
        None => None,
    };
    let raw = capture.as_ref().map_or("", |c| c.raw.as_str());

    let normalized = match &cli.command {
        Command::Counts(manual) => Normalized::from_counts("manual", manual.to_counts()?),
        _ => registry.normalize_preferring(raw, hint),
    };
    let summary = &normalized.summary;
    tracing::info!(
        dialect = normalized.dialect.unwrap_or("none"),
        status = %summary.status(),
        passed = summary.passed(),
        failed = summary.failed(),
        cases = normalized.cases.len(),
        "test output summarized"
    );

    let report = Report::from_normalized(&normalized, raw);
    out.write_all(render::render(&report, config.render.format, &config.render).as_bytes())?;
    out.flush()?;

    if let Some(path) = &cli.output {
        append(path, &render::render(&report, Format::Outputs, &config.render))
            .with_context(|| format!("writing outputs file {}", path.display()))?;
    }
    if let Some(path) = &cli.step_summary {
        let mut markdown = render::render(&report, Format::Markdown, &config.render);
        markdown.push('\n');
        append(path, &markdown).with_context(|| format!("writing step summary {}", path.display()))?;
    }

    if cli.no_gate {
        return Ok(0);
    }

    let mut verdict = gate::evaluate(summary, &config.gate);
    // A test command that died without printing a summary has failed, even
    // when uninterpretable output is otherwise allowed through.
    if matches!(feed, Some(Feed::Command { .. })) && summary.status() == Status::Unknown {
        let crashed = match capture.as_ref().and_then(|c| c.exit_code) {
            Some(0) => None,
            Some(code) => Some(format!("exited with code {code}")),
            None => Some("was killed by a signal".to_string()),
        };
        if let Some(how) = crashed {
            if !matches!(verdict, Verdict::Fail { .. }) {
                verdict = Verdict::Fail {
                    reason: format!("test command {how} and printed no recognisable summary"),
                };
            }
        }
    }
    if !verdict.is_pass() {
        eprintln!("tally: {verdict}");
    }
    Ok(verdict.exit_code())
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(format) = cli.format {
        config.render.format = format;
    }
    if let Some(dialect) = &cli.dialect {
        config.normalizer.dialect = dialect.clone();
    }
    let render: &mut RenderConfig = &mut config.render;
    if let Some(title) = &cli.title {
        render.title = title.clone();
    }
    if cli.no_badge {
        render.badge = false;
    }
    if cli.show_details {
        render.show_details = true;
    }
    if cli.show_passed {
        render.show_passed = true;
    }
    if let Some(max_lines) = cli.max_lines {
        render.max_lines = max_lines;
    }
}

fn append(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(text.as_bytes())
}
