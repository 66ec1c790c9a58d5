//! tally-feeds — raw test-output sources for tally.
//!
//! A [`Feed`] reads one complete test run's output and hands it back as a
//! [`Capture`]. Reading is the only I/O in tally; the normalizer in
//! `tally-core` works purely on the captured text.

mod command;
mod file;
mod stdin;

use std::path::PathBuf;

use tally_core::RawOutput;
use thiserror::Error;

/// Errors raised while reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {what}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program:?}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Output captured from a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub raw: RawOutput,
    /// Exit code of the child process, for [`Feed::Command`] only. `None` if
    /// the child was killed by a signal.
    pub exit_code: Option<i32>,
}

impl Capture {
    fn text(raw: RawOutput) -> Self {
        Self {
            raw,
            exit_code: None,
        }
    }
}

/// Where raw test output comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    File(PathBuf),
    Stdin,
    /// Run `program` with `args` and capture stdout followed by stderr.
    /// With `echo`, the output is also streamed to stderr while it runs.
    Command {
        program: String,
        args: Vec<String>,
        echo: bool,
    },
}

impl Feed {
    /// `-` means stdin, as with most Unix tools.
    pub fn from_path_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if p.as_os_str() != "-" => Feed::File(p),
            _ => Feed::Stdin,
        }
    }

    /// Read the feed to completion.
    pub async fn read(&self) -> Result<Capture, FeedError> {
        let capture = match self {
            Feed::File(path) => file::read(path).await?,
            Feed::Stdin => stdin::read(tokio::io::stdin()).await?,
            Feed::Command { program, args, echo } => command::run(program, args, *echo).await?,
        };
        tracing::debug!(
            feed = %self,
            bytes = capture.raw.as_str().len(),
            exit_code = ?capture.exit_code,
            "feed captured"
        );
        Ok(capture)
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feed::File(path) => write!(f, "file:{}", path.display()),
            Feed::Stdin => write!(f, "stdin"),
            Feed::Command { program, .. } => write!(f, "command:{program}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(Feed::from_path_arg(Some(PathBuf::from("-"))), Feed::Stdin);
        assert_eq!(Feed::from_path_arg(None), Feed::Stdin);
        assert_eq!(
            Feed::from_path_arg(Some(PathBuf::from("out.tap"))),
            Feed::File(PathBuf::from("out.tap"))
        );
    }

    #[test]
    fn display_names_the_source() {
        assert_eq!(Feed::Stdin.to_string(), "stdin");
        assert_eq!(
            Feed::Command {
                program: "node".into(),
                args: vec!["--test".into()],
                echo: false,
            }
            .to_string(),
            "command:node"
        );
    }
}
