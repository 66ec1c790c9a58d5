//! Stdin feed — reads until EOF.

use tokio::io::{AsyncRead, AsyncReadExt};

use tally_core::RawOutput;

use crate::{Capture, FeedError};

/// Generic over the reader so tests can substitute an in-memory stream.
pub(crate) async fn read<R: AsyncRead + Unpin>(mut reader: R) -> Result<Capture, FeedError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|source| FeedError::Io {
            what: "stdin".to_string(),
            source,
        })?;
    Ok(Capture::text(RawOutput::from_bytes(&bytes)))
}
