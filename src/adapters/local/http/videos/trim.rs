use super::{bad_json, TransformResponse};
use crate::adapters::local::http::AppState;
use crate::domain::jobs::TrimRange;
use crate::error::{VideoError, VideoResult};
use crate::ports::{executor::MediaExecutor, storage::VideoStore};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TrimRequest {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
}

pub async fn handle<S, E>(
    State(state): State<AppState<S, E>>,
    body: Result<Json<TrimRequest>, JsonRejection>,
) -> VideoResult<(StatusCode, Json<TransformResponse>)>
where
    S: VideoStore,
    E: MediaExecutor,
{
    let Json(request) = body.map_err(bad_json)?;

    let (Some(file_id), Some(start), Some(end)) = (
        request.file_id.filter(|id| !id.is_empty()),
        request.trim_start,
        request.trim_end,
    ) else {
        return Err(VideoError::ClientInput(
            "fileId, trim_start and trim_end are all required".to_string(),
        ));
    };
    let range = TrimRange::new(start, end)?;

    let output = state.transform.trim(&file_id, range).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransformResponse::new("video trimmed successfully", output)),
    ))
}
