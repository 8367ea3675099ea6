//! HTTP inbound adapter.
//!
//! Routes the `/video/*` API and serves stored files under `/upload`.

pub mod videos;

use crate::application::{library::LibraryService, transform::TransformService};
use crate::ports::{executor::MediaExecutor, storage::VideoStore};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub struct AppState<S, E> {
    pub library: Arc<LibraryService<S>>,
    pub transform: Arc<TransformService<S, E>>,
}

impl<S, E> AppState<S, E> {
    pub fn new(library: LibraryService<S>, transform: TransformService<S, E>) -> Self {
        Self {
            library: Arc::new(library),
            transform: Arc::new(transform),
        }
    }
}

impl<S, E> Clone for AppState<S, E> {
    fn clone(&self) -> Self {
        Self {
            library: self.library.clone(),
            transform: self.transform.clone(),
        }
    }
}

pub fn router<S, E>(state: AppState<S, E>, upload_dir: &Path) -> Router
where
    S: VideoStore + 'static,
    E: MediaExecutor + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/video/upload", post(videos::upload::handle::<S, E>))
        .route("/video/list", get(videos::list::uploaded::<S, E>))
        .route("/video/trim", post(videos::trim::handle::<S, E>))
        .route("/video/trim-list", get(videos::list::trimmed::<S, E>))
        .route("/video/concat", post(videos::concat::handle::<S, E>))
        .route("/video/concat-list", get(videos::list::concatenated::<S, E>))
        .with_state(state)
        .nest_service("/upload", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
