//! Server binary: local filesystem storage, `ffmpeg` subprocesses, HTTP API.

use clipyard::application::{library::LibraryService, transform::TransformService};
use clipyard::domain::video::VideoKind;
use clipyard::http::{self, AppState};
use clipyard::ports::storage::VideoStore;
use clipyard::{AppConfig, FfmpegExecutor, LocalStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();

    // 1. Adapters
    let store = LocalStore::new(&config.upload_dir);
    if let Err(e) = store.prepare(VideoKind::Raw).await {
        tracing::error!("Failed to create upload directory {:?}: {}", config.upload_dir, e);
        std::process::exit(1);
    }
    let executor = FfmpegExecutor::new(&config.ffmpeg_path);

    // 2. Application services
    let state = AppState::new(
        LibraryService::new(store.clone(), config.max_upload_files),
        TransformService::new(store, executor, config.tool_timeout),
    );

    // 3. HTTP layer
    let app = http::router(state, &config.upload_dir);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    tracing::info!("Listening at {}:{}", config.addr, config.port);
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
