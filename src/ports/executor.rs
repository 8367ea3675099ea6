//! Executor port for the external media tool.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// The single terminal event of one external tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Output fully written at the given path
    Completed(PathBuf),
    Failed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExecutor: Send + Sync {
    /// Extract `duration` seconds of `input` starting at `start` into `output`.
    async fn trim(&self, input: &Path, start: f64, duration: f64, output: &Path) -> ToolOutcome;

    /// Join `inputs` in order into `output` without re-encoding.
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome;
}
