//! File feed — reads a saved test log in one go.

use std::path::Path;

use tally_core::RawOutput;

use crate::{Capture, FeedError};

pub(crate) async fn read(path: &Path) -> Result<Capture, FeedError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| FeedError::Io {
        what: path.display().to_string(),
        source,
    })?;
    Ok(Capture::text(RawOutput::from_bytes(&bytes)))
}
