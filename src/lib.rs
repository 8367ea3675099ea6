//! Clipyard - Video upload, trim and concat service
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (stored videos, jobs)
//! - ports/: Trait definitions (storage, external tool)
//! - adapters/: Concrete implementations (filesystem, ffmpeg, HTTP)
//! - application/: Generic services
//! - config: Environment configuration
//!
//! All media work is delegated to `ffmpeg`; this crate does the file
//! bookkeeping around it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use adapters::local::{http, FfmpegExecutor, LocalStore};
pub use config::AppConfig;
pub use error::VideoError;
