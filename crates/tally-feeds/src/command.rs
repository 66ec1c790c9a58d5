//! Command feed — runs a test command and captures everything it prints.
//!
//! stdout and stderr are read concurrently as the child writes them. With
//! `echo` on, every chunk is forwarded to our stderr as soon as it arrives,
//! so a long test run stays visible in the CI log while it is captured.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

use tally_core::RawOutput;

use crate::{Capture, FeedError};

const CHUNK: usize = 8 * 1024;

pub(crate) async fn run(program: &str, args: &[String], echo: bool) -> Result<Capture, FeedError> {
    tracing::debug!(program, ?args, echo, "spawning test command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| FeedError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let io_error = |source: std::io::Error| FeedError::Io {
        what: format!("output of {program}"),
        source,
    };
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(io_error(std::io::Error::other("child output was not piped")));
    };

    let sink = || echo.then(tokio::io::stderr);
    let (mut bytes, err_bytes) =
        tokio::try_join!(pump(stdout, sink()), pump(stderr, sink())).map_err(io_error)?;
    let status = child.wait().await.map_err(io_error)?;

    if !err_bytes.is_empty() {
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(&err_bytes);
    }

    Ok(Capture {
        raw: RawOutput::from_bytes(&bytes),
        exit_code: status.code(),
    })
}

/// Read `reader` to EOF, returning everything read. Each chunk is also
/// written to `echo`; if echoing fails, capture continues without it.
async fn pump<R, W>(mut reader: R, mut echo: Option<W>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut buf = vec![0u8; CHUNK];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&buf[..n]);
        if let Some(out) = echo.as_mut() {
            if let Err(err) = forward(out, &buf[..n]).await {
                tracing::warn!(%err, "stopped echoing test output");
                echo = None;
            }
        }
    }
    Ok(captured)
}

async fn forward<W: AsyncWrite + Unpin>(out: &mut W, chunk: &[u8]) -> std::io::Result<()> {
    out.write_all(chunk).await?;
    out.flush().await
}
