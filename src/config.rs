//! Configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Raw uploads live here, outputs in its `trim/` and `concat/` sub-directories
    pub upload_dir: PathBuf,
    /// The external video tool
    pub ffmpeg_path: String,
    /// Upper bound for a single tool run
    pub tool_timeout: Duration,
    /// Files accepted per upload request
    pub max_upload_files: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3000")),
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| String::from("./upload")),
            ),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| String::from("ffmpeg")),
            tool_timeout: Duration::from_secs(parse_or(
                "TOOL_TIMEOUT_SECS",
                env::var("TOOL_TIMEOUT_SECS").ok(),
                600,
            )),
            max_upload_files: parse_or("MAX_UPLOAD_FILES", env::var("MAX_UPLOAD_FILES").ok(), 10),
        }
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} has invalid value {:?}, using {}", name, raw, default);
            default
        }),
    }
}
