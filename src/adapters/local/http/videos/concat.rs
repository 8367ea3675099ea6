use super::{bad_json, TransformResponse};
use crate::adapters::local::http::AppState;
use crate::error::{VideoError, VideoResult};
use crate::ports::{executor::MediaExecutor, storage::VideoStore};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConcatRequest {
    #[serde(rename = "fileIds")]
    pub file_ids: Option<Vec<String>>,
}

pub async fn handle<S, E>(
    State(state): State<AppState<S, E>>,
    body: Result<Json<ConcatRequest>, JsonRejection>,
) -> VideoResult<(StatusCode, Json<TransformResponse>)>
where
    S: VideoStore,
    E: MediaExecutor,
{
    let Json(request) = body.map_err(bad_json)?;

    let file_ids = request.file_ids.ok_or_else(|| {
        VideoError::ClientInput("fileIds with at least two file ids is required".to_string())
    })?;

    let output = state.transform.concat(&file_ids).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransformResponse::new("videos concatenated successfully", output)),
    ))
}
