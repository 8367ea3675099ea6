//! Storage port: where uploads and processed outputs live.

use crate::domain::video::{StoredVideo, VideoKind};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

/// The upload body broke off while it was being read.
///
/// Readers handed to [`VideoStore::put`] wrap their own failures in this so
/// callers can tell a bad request apart from a failed local write.
#[derive(Debug, thiserror::Error)]
#[error("upload body interrupted: {0}")]
pub struct BodyInterrupted(pub String);

impl BodyInterrupted {
    pub fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::Other, self)
    }

    /// True when `err` came from the body rather than the store.
    pub fn caused(err: &io::Error) -> bool {
        err.get_ref()
            .is_some_and(|inner| inner.is::<BodyInterrupted>())
    }
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Stream `body` into a new raw video named by a fresh id and `extension`.
    /// Nothing is left behind when the body or the write fails.
    async fn put(
        &self,
        extension: &str,
        body: &mut (dyn AsyncRead + Unpin + Send),
    ) -> io::Result<StoredVideo>;

    /// Delete a stored video
    async fn remove(&self, video: &StoredVideo) -> io::Result<()>;

    /// Find the raw video stored under `file_id`, whatever its extension
    async fn resolve(&self, file_id: &str) -> io::Result<Option<StoredVideo>>;

    /// Every video of `kind`, sorted by file name.
    /// Fails when the directory is missing, so "no directory" and "empty" stay distinct.
    async fn list(&self, kind: VideoKind) -> io::Result<Vec<StoredVideo>>;

    /// Make sure the directory for `kind` exists
    async fn prepare(&self, kind: VideoKind) -> io::Result<()>;

    /// A fresh scratch path for an in-flight operation. Never matches a listing.
    fn scratch(&self, suffix: &str) -> PathBuf;

    /// Move a finished scratch file into the `kind` directory as `file_name`
    async fn finalize(
        &self,
        scratch: &Path,
        kind: VideoKind,
        file_name: &str,
    ) -> io::Result<StoredVideo>;
}
