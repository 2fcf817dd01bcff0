use std::path::Path;

use bytes::Bytes;

use crate::Result;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A single user-chosen file, as handed over by the picker or a drop.
///
/// Values are immutable: a later selection replaces the whole value. `content` is a `Bytes`
/// handle so capturing the selection for a submission does not copy the media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: Bytes,
    media_type: String,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Bytes>,
        media_type: impl Into<String>,
    ) -> Self {
        let media_type = media_type.into();
        let media_type = if media_type.trim().is_empty() {
            FALLBACK_MEDIA_TYPE.to_string()
        } else {
            media_type
        };

        Self {
            name: name.into(),
            content: content.into(),
            media_type,
        }
    }

    /// Load a file from disk, inferring the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = media_type_for(path);

        Ok(Self::new(name, content, media_type))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Best-effort media type for common audio/video containers.
///
/// No validation happens here; unknown extensions fall back to `application/octet-stream`
/// and the service decides what it can decode.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        _ => FALLBACK_MEDIA_TYPE,
    }
}
