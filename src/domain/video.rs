//! Stored video records and the naming rules shared by every directory.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Extensions accepted on upload, in the order they are probed when a
/// file id is resolved back to a stored file.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["mp4", "mov", "avi"];

fn video_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(avi|mp4|mov)$").expect("video name pattern is valid"))
}

/// True when `name` ends in one of the allowed video extensions (case-sensitive).
pub fn is_video_name(name: &str) -> bool {
    video_name_pattern().is_match(name)
}

/// Extension (without the dot) of an uploaded file name, if it is allowed.
pub fn allowed_extension(original_name: &str) -> Option<&str> {
    let extension = Path::new(original_name).extension()?.to_str()?;
    is_video_name(&format!(".{extension}")).then_some(extension)
}

/// The public handle of a stored file: everything before the first dot.
pub fn file_id_of(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(index) => &file_name[..index],
        None => file_name,
    }
}

/// A file id must name exactly one entry inside a storage directory.
pub fn is_valid_file_id(file_id: &str) -> bool {
    if file_id.is_empty()
        || file_id.contains(['/', '\\'])
        || file_id.contains(char::is_control)
    {
        return false;
    }
    let mut components = Path::new(file_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Which directory a video lives in. There is no stored kind field; the
/// directory a listing reads from decides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoKind {
    Raw,
    Trimmed,
    Concatenated,
}

impl VideoKind {
    /// Sub-directory under the upload root, `None` for the root itself.
    pub fn subdir(&self) -> Option<&'static str> {
        match self {
            VideoKind::Raw => None,
            VideoKind::Trimmed => Some("trim"),
            VideoKind::Concatenated => Some("concat"),
        }
    }

    pub fn public_prefix(&self) -> &'static str {
        match self {
            VideoKind::Raw => "/upload/",
            VideoKind::Trimmed => "/upload/trim/",
            VideoKind::Concatenated => "/upload/concat/",
        }
    }

    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}{}", self.public_prefix(), file_name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoKind::Raw => "uploaded",
            VideoKind::Trimmed => "trimmed",
            VideoKind::Concatenated => "concatenated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVideo {
    pub id: String,
    pub file_name: String,
    /// Location on disk
    pub path: PathBuf,
    pub kind: VideoKind,
}

impl StoredVideo {
    pub fn new(kind: VideoKind, file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let file_name = file_name.into();
        Self {
            id: file_id_of(&file_name).to_string(),
            file_name,
            path: path.into(),
            kind,
        }
    }

    pub fn public_path(&self) -> String {
        self.kind.public_path(&self.file_name)
    }
}
