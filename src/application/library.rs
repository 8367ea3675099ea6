//! Upload batches and the three catalog listings.

use crate::domain::video::{allowed_extension, StoredVideo, VideoKind};
use crate::error::{VideoError, VideoResult};
use crate::ports::storage::{BodyInterrupted, VideoStore};
use tokio::io::AsyncRead;

/// Uploads and catalog listings.
pub struct LibraryService<S> {
    store: S,
    max_files: usize,
}

impl<S> LibraryService<S>
where
    S: VideoStore,
{
    pub fn new(store: S, max_files: usize) -> Self {
        Self { store, max_files }
    }

    pub fn batch(&self) -> UploadBatch<'_, S> {
        UploadBatch {
            store: &self.store,
            limit: self.max_files,
            seen: 0,
            stored: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub async fn list(&self, kind: VideoKind) -> VideoResult<Vec<StoredVideo>> {
        self.store.list(kind).await.map_err(|e| {
            tracing::warn!("Listing {} videos failed: {}", kind.label(), e);
            VideoError::ClientInput(format!("failed to load the {} video list", kind.label()))
        })
    }
}

/// Files of one upload request.
pub struct UploadBatch<'a, S> {
    store: &'a S,
    limit: usize,
    seen: usize,
    stored: Vec<StoredVideo>,
    rejected: Vec<String>,
}

#[derive(Debug)]
pub struct UploadReport {
    pub stored: Vec<StoredVideo>,
    pub rejected: Vec<String>,
}

impl<'a, S> UploadBatch<'a, S>
where
    S: VideoStore,
{
    /// Store one file, or set it aside when its extension is not allowed.
    pub async fn add(
        &mut self,
        original_name: &str,
        body: &mut (dyn AsyncRead + Unpin + Send),
    ) -> VideoResult<()> {
        self.seen += 1;
        if self.seen > self.limit {
            return Err(VideoError::ClientInput(format!(
                "too many files, at most {} per request",
                self.limit
            )));
        }

        let Some(extension) = allowed_extension(original_name) else {
            tracing::info!("Rejecting upload {:?}: unsupported extension", original_name);
            self.rejected.push(original_name.to_string());
            return Ok(());
        };

        let video = self.store.put(extension, body).await.map_err(|e| {
            if BodyInterrupted::caused(&e) {
                tracing::warn!("Upload {:?} broke off: {}", original_name, e);
                VideoError::ClientInput(format!(
                    "failed to read multipart body for {original_name}"
                ))
            } else {
                tracing::error!("Storing upload {:?} failed: {}", original_name, e);
                VideoError::Io(format!("failed to store {original_name}"))
            }
        })?;
        tracing::info!("Stored upload {:?} as {}", original_name, video.file_name);
        self.stored.push(video);

        Ok(())
    }

    /// Remove whatever this batch already stored.
    pub async fn discard(&mut self) {
        for video in self.stored.drain(..) {
            if let Err(e) = self.store.remove(&video).await {
                tracing::warn!("Could not remove {:?}: {}", video.path, e);
            }
        }
    }

    pub fn finish(self) -> VideoResult<UploadReport> {
        if self.stored.is_empty() {
            let message = if self.rejected.is_empty() {
                "no files uploaded".to_string()
            } else {
                format!(
                    "unsupported file format, allowed are avi, mp4 and mov: {}",
                    self.rejected.join(", ")
                )
            };
            return Err(VideoError::ClientInput(message));
        }

        Ok(UploadReport {
            stored: self.stored,
            rejected: self.rejected,
        })
    }
}
