use crate::ports::executor::{MediaExecutor, ToolOutcome};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::fs;
use tokio::process::Command;

/// Runs the `ffmpeg` command line tool.
#[derive(Debug, Clone)]
pub struct FfmpegExecutor {
    program: String,
}

impl FfmpegExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-y")
            .kill_on_drop(true);
        command
    }

    fn outcome(&self, result: io::Result<Output>, output_path: &Path, descriptor: &str) -> ToolOutcome {
        match result {
            Ok(output) if output.status.success() => ToolOutcome::Completed(output_path.to_path_buf()),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = stderr.lines().last().unwrap_or("no output").trim();
                ToolOutcome::Failed(format!("{descriptor} exited with {}: {detail}", output.status))
            }
            Err(e) => ToolOutcome::Failed(format!("failed to start {}: {e}", self.program)),
        }
    }
}

/// Manifest for the concat demuxer, one `file '<path>'` line per input.
pub(crate) fn concat_manifest(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|path| format!("file '{}'\n", path.to_string_lossy().replace('\'', r"'\''")))
        .collect()
}

#[async_trait]
impl MediaExecutor for FfmpegExecutor {
    async fn trim(&self, input: &Path, start: f64, duration: f64, output: &Path) -> ToolOutcome {
        let mut command = self.command();
        command
            .arg("-ss")
            .arg(start.to_string())
            .arg("-i")
            .arg(input)
            .arg("-t")
            .arg(duration.to_string())
            .arg("-f")
            .arg("mp4")
            .arg(output);

        tracing::debug!("ffmpeg trim {:?} [{start}s +{duration}s] -> {:?}", input, output);
        self.outcome(command.output().await, output, "ffmpeg trim")
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome {
        // Relative manifest entries resolve against the manifest's directory
        let mut absolute = Vec::with_capacity(inputs.len());
        for input in inputs {
            match fs::canonicalize(input).await {
                Ok(path) => absolute.push(path),
                Err(e) => return ToolOutcome::Failed(format!("cannot read input {:?}: {e}", input)),
            }
        }

        let manifest_path = output.with_extension("concat.txt");
        if let Err(e) = fs::write(&manifest_path, concat_manifest(&absolute)).await {
            return ToolOutcome::Failed(format!("cannot write concat manifest: {e}"));
        }

        let mut command = self.command();
        command
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(&manifest_path)
            .arg("-c")
            .arg("copy")
            .arg("-f")
            .arg("mp4")
            .arg(output);

        tracing::debug!("ffmpeg concat {} inputs -> {:?}", inputs.len(), output);
        let result = command.output().await;

        if let Err(e) = fs::remove_file(&manifest_path).await {
            tracing::warn!("Could not remove concat manifest {:?}: {}", manifest_path, e);
        }

        self.outcome(result, output, "ffmpeg concat")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_concat_manifest_keeps_order() {
        let inputs = vec![
            PathBuf::from("/data/upload/b.mp4"),
            PathBuf::from("/data/upload/a.mp4"),
            PathBuf::from("/data/upload/c.mp4"),
        ];
        let manifest = concat_manifest(&inputs);
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file '/data/upload/b.mp4'",
                "file '/data/upload/a.mp4'",
                "file '/data/upload/c.mp4'",
            ]
        );
    }

    #[test]
    fn test_concat_manifest_escapes_quotes() {
        let manifest = concat_manifest(&[PathBuf::from("/data/it's.mp4")]);
        assert_eq!(manifest, "file '/data/it'\\''s.mp4'\n");
    }

    #[test]
    fn test_concat_manifest_empty() {
        assert!(concat_manifest(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_reports_failure() {
        let temp_dir = tempdir().unwrap();
        let executor = FfmpegExecutor::new("/nonexistent/ffmpeg-binary");
        let output = temp_dir.path().join("out.mp4.part");

        let outcome = executor
            .trim(&temp_dir.path().join("in.mp4"), 0.0, 1.0, &output)
            .await;

        match outcome {
            ToolOutcome::Failed(reason) => assert!(reason.starts_with("failed to start")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides_outcome() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("out.mp4.part");
        let input = temp_dir.path().join("in.mp4");

        let ok = FfmpegExecutor::new("true").trim(&input, 0.0, 1.0, &output).await;
        assert_eq!(ok, ToolOutcome::Completed(output.clone()));

        let failed = FfmpegExecutor::new("false").trim(&input, 0.0, 1.0, &output).await;
        assert!(matches!(failed, ToolOutcome::Failed(reason) if reason.contains("ffmpeg trim")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_concat_removes_manifest() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("a.mp4");
        let second = temp_dir.path().join("b.mp4");
        std::fs::write(&first, b"").unwrap();
        std::fs::write(&second, b"").unwrap();
        let output = temp_dir.path().join("out.mp4.part");

        let outcome = FfmpegExecutor::new("true").concat(&[first, second], &output).await;

        assert_eq!(outcome, ToolOutcome::Completed(output.clone()));
        assert!(!output.with_extension("concat.txt").exists());
    }

    #[tokio::test]
    async fn test_concat_missing_input_fails_before_running() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("out.mp4.part");

        let outcome = FfmpegExecutor::new("true")
            .concat(&[temp_dir.path().join("gone.mp4")], &output)
            .await;

        assert!(matches!(outcome, ToolOutcome::Failed(reason) if reason.starts_with("cannot read input")));
    }
}
