//! `/video/*` handlers and their JSON shapes.

pub mod concat;
pub mod list;
pub mod trim;
pub mod upload;

use crate::application::transform::TransformOutput;
use crate::error::VideoError;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub message: &'static str,
    pub file_path: String,
    pub download_url: String,
}

impl TransformResponse {
    fn new(message: &'static str, output: TransformOutput) -> Self {
        Self {
            message,
            file_path: output.file_path.to_string_lossy().to_string(),
            download_url: output.download_url,
        }
    }
}

fn bad_json(rejection: JsonRejection) -> VideoError {
    VideoError::ClientInput(rejection.body_text())
}
