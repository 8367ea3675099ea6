use crate::adapters::local::http::AppState;
use crate::error::{VideoError, VideoResult};
use crate::ports::executor::MediaExecutor;
use crate::ports::storage::{BodyInterrupted, VideoStore};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use serde::Serialize;
use tokio_util::io::StreamReader;

/// Multipart field carrying the files.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_id: String,
    pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub files: Vec<UploadedFile>,
    pub rejected: Vec<String>,
}

// Streams every `file` field into the store.
pub async fn handle<S, E>(
    State(state): State<AppState<S, E>>,
    mut multipart: Multipart,
) -> VideoResult<(StatusCode, Json<UploadResponse>)>
where
    S: VideoStore,
    E: MediaExecutor,
{
    let mut batch = state.library.batch();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                batch.discard().await;
                return Err(VideoError::ClientInput(format!(
                    "failed to read multipart body: {e}"
                )));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = if let Some(file_name) = field.file_name() {
            file_name.to_owned()
        } else {
            continue;
        };

        let body = field.map_err(|err| BodyInterrupted(err.to_string()).into_io());
        let body_reader = StreamReader::new(body);
        futures::pin_mut!(body_reader);

        if let Err(e) = batch.add(&file_name, &mut body_reader).await {
            batch.discard().await;
            return Err(e);
        }
    }

    let report = batch.finish()?;
    let files = report
        .stored
        .into_iter()
        .map(|video| UploadedFile {
            file_path: video.public_path(),
            file_id: video.id,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "files uploaded successfully",
            files,
            rejected: report.rejected,
        }),
    ))
}
