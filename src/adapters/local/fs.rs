//! Local filesystem storage under a single upload root.

use crate::domain::video::{is_video_name, StoredVideo, VideoKind, ALLOWED_EXTENSIONS};
use crate::ports::storage::VideoStore;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};
use uuid::Uuid;

/// Filesystem store: raw uploads in the root, outputs in `trim/` and `concat/`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: VideoKind) -> PathBuf {
        match kind.subdir() {
            Some(subdir) => self.root.join(subdir),
            None => self.root.clone(),
        }
    }
}

async fn write_body(path: &Path, body: &mut (dyn AsyncRead + Unpin + Send)) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path).await?);
    tokio::io::copy(body, &mut file).await?;
    file.flush().await
}

async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove partial upload {:?}: {}", path, e),
    }
}

#[async_trait]
impl VideoStore for LocalStore {
    async fn put(
        &self,
        extension: &str,
        body: &mut (dyn AsyncRead + Unpin + Send),
    ) -> io::Result<StoredVideo> {
        fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&file_name);
        let partial = self.root.join(format!("{file_name}.part"));
        tracing::debug!("Saving new file to {:?}", path);

        let written = match write_body(&partial, body).await {
            Ok(()) => fs::rename(&partial, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            remove_partial(&partial).await;
            return Err(e);
        }

        Ok(StoredVideo::new(VideoKind::Raw, file_name, path))
    }

    async fn remove(&self, video: &StoredVideo) -> io::Result<()> {
        fs::remove_file(&video.path).await
    }

    async fn resolve(&self, file_id: &str) -> io::Result<Option<StoredVideo>> {
        for extension in ALLOWED_EXTENSIONS {
            let file_name = format!("{file_id}.{extension}");
            let path = self.root.join(&file_name);
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {
                    return Ok(Some(StoredVideo::new(VideoKind::Raw, file_name, path)));
                }
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    async fn list(&self, kind: VideoKind) -> io::Result<Vec<StoredVideo>> {
        let dir = self.dir(kind);
        let mut entries = fs::read_dir(&dir).await?;

        let mut videos = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if is_video_name(&name) {
                videos.push(StoredVideo::new(kind, name, entry.path()));
            }
        }
        videos.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Ok(videos)
    }

    async fn prepare(&self, kind: VideoKind) -> io::Result<()> {
        fs::create_dir_all(self.dir(kind)).await
    }

    fn scratch(&self, suffix: &str) -> PathBuf {
        self.root.join(format!("{}.{}", Uuid::new_v4(), suffix))
    }

    async fn finalize(
        &self,
        scratch: &Path,
        kind: VideoKind,
        file_name: &str,
    ) -> io::Result<StoredVideo> {
        let target = self.dir(kind).join(file_name);
        fs::rename(scratch, &target).await?;
        Ok(StoredVideo::new(kind, file_name, target))
    }
}
