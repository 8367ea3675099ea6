use crate::adapters::local::http::AppState;
use crate::domain::video::{StoredVideo, VideoKind};
use crate::error::VideoResult;
use crate::ports::{executor::MediaExecutor, storage::VideoStore};
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedVideo {
    pub file_id: String,
    pub file_name: String,
    pub file_path: String,
}

impl From<StoredVideo> for ListedVideo {
    fn from(video: StoredVideo) -> Self {
        Self {
            file_path: video.public_path(),
            file_id: video.id,
            file_name: video.file_name,
        }
    }
}

async fn list<S, E>(state: &AppState<S, E>, kind: VideoKind) -> VideoResult<Json<Vec<ListedVideo>>>
where
    S: VideoStore,
    E: MediaExecutor,
{
    let videos = state.library.list(kind).await?;
    Ok(Json(videos.into_iter().map(ListedVideo::from).collect()))
}

pub async fn uploaded<S, E>(State(state): State<AppState<S, E>>) -> VideoResult<Json<Vec<ListedVideo>>>
where
    S: VideoStore,
    E: MediaExecutor,
{
    list(&state, VideoKind::Raw).await
}

pub async fn trimmed<S, E>(State(state): State<AppState<S, E>>) -> VideoResult<Json<Vec<ListedVideo>>>
where
    S: VideoStore,
    E: MediaExecutor,
{
    list(&state, VideoKind::Trimmed).await
}

pub async fn concatenated<S, E>(
    State(state): State<AppState<S, E>>,
) -> VideoResult<Json<Vec<ListedVideo>>>
where
    S: VideoStore,
    E: MediaExecutor,
{
    list(&state, VideoKind::Concatenated).await
}
