//! Trim and concat orchestration around the media tool.

use crate::domain::jobs::{Job, JobKind, TrimRange};
use crate::domain::video::{is_valid_file_id, VideoKind};
use crate::error::{VideoError, VideoResult};
use crate::ports::executor::{MediaExecutor, ToolOutcome};
use crate::ports::storage::VideoStore;
use chrono::Utc;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

const SCRATCH_SUFFIX: &str = "mp4.part";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub file_path: PathBuf,
    pub download_url: String,
}

/// Trim and concat orchestration around the external tool.
pub struct TransformService<S, E> {
    store: S,
    executor: E,
    tool_timeout: Duration,
    last_stamp: AtomicI64,
}

impl<S, E> TransformService<S, E>
where
    S: VideoStore,
    E: MediaExecutor,
{
    pub fn new(store: S, executor: E, tool_timeout: Duration) -> Self {
        Self {
            store,
            executor,
            tool_timeout,
            last_stamp: AtomicI64::new(0),
        }
    }

    pub async fn trim(&self, file_id: &str, range: TrimRange) -> VideoResult<TransformOutput> {
        let mut job = Job::new(JobKind::Trim);
        tracing::info!(job = %job.id, "Trimming {} [{}s, {}s)", file_id, range.start(), range.end());

        let result = self.run_trim(&mut job, file_id, range).await;
        settle(&mut job, result)
    }

    pub async fn concat(&self, file_ids: &[String]) -> VideoResult<TransformOutput> {
        let mut job = Job::new(JobKind::Concat);
        tracing::info!(job = %job.id, "Concatenating {:?}", file_ids);

        let result = self.run_concat(&mut job, file_ids).await;
        settle(&mut job, result)
    }

    async fn run_trim(
        &self,
        job: &mut Job,
        file_id: &str,
        range: TrimRange,
    ) -> VideoResult<TransformOutput> {
        ensure_valid_id(file_id)?;

        self.store
            .prepare(VideoKind::Trimmed)
            .await
            .map_err(|e| storage_error("prepare the trim directory", e))?;

        let source = self
            .store
            .resolve(file_id)
            .await
            .map_err(|e| storage_error("look up the source file", e))?
            .ok_or_else(|| VideoError::NotFound(format!("file not found: {file_id}")))?;

        job.start_processing();
        let scratch = self.store.scratch(SCRATCH_SUFFIX);
        let produced = self
            .run_tool(
                job,
                self.executor
                    .trim(&source.path, range.start(), range.duration(), &scratch),
                "failed to trim video",
            )
            .await?;

        job.start_finalizing();
        let file_name = format!("{}_trimmed_{}.mp4", file_id, self.next_stamp());
        self.finalize(&produced, VideoKind::Trimmed, &file_name).await
    }

    async fn run_concat(&self, job: &mut Job, file_ids: &[String]) -> VideoResult<TransformOutput> {
        if file_ids.len() < 2 {
            return Err(VideoError::ClientInput(
                "at least two file ids are required".to_string(),
            ));
        }

        let mut inputs = Vec::with_capacity(file_ids.len());
        for file_id in file_ids {
            ensure_valid_id(file_id)?;
            let source = self
                .store
                .resolve(file_id)
                .await
                .map_err(|e| storage_error("look up a source file", e))?
                .ok_or_else(|| VideoError::ClientInput(format!("file not found: {file_id}")))?;
            inputs.push(source.path);
        }

        self.store
            .prepare(VideoKind::Concatenated)
            .await
            .map_err(|e| storage_error("prepare the concat directory", e))?;

        job.start_processing();
        let scratch = self.store.scratch(SCRATCH_SUFFIX);
        let produced = self
            .run_tool(
                job,
                self.executor.concat(&inputs, &scratch),
                "failed to concatenate videos",
            )
            .await?;

        job.start_finalizing();
        let file_name = format!("concatenated_{}.mp4", self.next_stamp());
        self.finalize(&produced, VideoKind::Concatenated, &file_name).await
    }

    async fn run_tool(
        &self,
        job: &Job,
        run: impl Future<Output = ToolOutcome>,
        failure: &str,
    ) -> VideoResult<PathBuf> {
        match tokio::time::timeout(self.tool_timeout, run).await {
            Ok(ToolOutcome::Completed(path)) => Ok(path),
            Ok(ToolOutcome::Failed(reason)) => {
                tracing::error!(job = %job.id, "{} tool run failed: {}", job.kind, reason);
                Err(VideoError::Processing(failure.to_string()))
            }
            Err(_) => {
                tracing::error!(job = %job.id, "{} tool run timed out", job.kind);
                Err(VideoError::Timeout(self.tool_timeout.as_secs()))
            }
        }
    }

    async fn finalize(
        &self,
        produced: &Path,
        kind: VideoKind,
        file_name: &str,
    ) -> VideoResult<TransformOutput> {
        let video = self
            .store
            .finalize(produced, kind, file_name)
            .await
            .map_err(|e| {
                tracing::error!("Moving {:?} to {} failed: {}", produced, file_name, e);
                VideoError::Io("failed to move the processed file".to_string())
            })?;

        Ok(TransformOutput {
            download_url: video.public_path(),
            file_path: video.path,
        })
    }

    /// Millisecond timestamp, strictly increasing across calls.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

fn ensure_valid_id(file_id: &str) -> VideoResult<()> {
    if is_valid_file_id(file_id) {
        Ok(())
    } else {
        Err(VideoError::ClientInput(format!("invalid file id: {file_id:?}")))
    }
}

fn storage_error(action: &str, e: std::io::Error) -> VideoError {
    tracing::error!("Could not {}: {}", action, e);
    VideoError::Io(format!("could not {action}"))
}

fn settle(job: &mut Job, result: VideoResult<TransformOutput>) -> VideoResult<TransformOutput> {
    match &result {
        Ok(output) => {
            job.complete();
            tracing::info!(job = %job.id, "{} done: {}", job.kind, output.download_url);
        }
        Err(e) => job.fail(e),
    }
    result
}
