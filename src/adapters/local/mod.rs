//! Local adapters for single-server deployment.

pub mod ffmpeg;
pub mod fs;
pub mod http;

pub use ffmpeg::FfmpegExecutor;
pub use fs::LocalStore;
