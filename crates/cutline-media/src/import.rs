//! Media import validation.
//!
//! No decoding happens here: the caller supplies the duration it learned from
//! its player, and this module only decides whether the file is a video.

use std::path::Path;

use cutline_core::{CutlineError, RationalTime, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A video file accepted for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaImport {
    /// File name shown on the timeline
    pub file_name: String,
    /// MIME type, always `video/*`
    pub mime_type: String,
    pub duration: RationalTime,
}

impl MediaImport {
    /// Validate a file by name, using `mime_type` when known or guessing it from the extension.
    pub fn new(file_name: &str, mime_type: Option<&str>, duration: RationalTime) -> Result<Self> {
        let mime = require_video(file_name, mime_type)?;
        if !duration.is_positive() {
            return Err(CutlineError::InvalidParameter(format!(
                "media duration must be positive, got {duration}"
            )));
        }
        info!("Accepted {} as {}", file_name, mime);
        Ok(Self {
            file_name: file_name.to_string(),
            mime_type: mime.to_string(),
            duration,
        })
    }

    /// Validate a file on disk. The file must exist.
    pub fn from_path<P: AsRef<Path>>(path: P, duration: RationalTime) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CutlineError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::new(&file_name, None, duration)
    }
}

/// Resolve the MIME type and require `video/*`.
pub fn require_video<'a>(file_name: &str, mime_type: Option<&'a str>) -> Result<&'a str> {
    let mime = mime_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| guess_mime(file_name));
    match mime {
        Some(mime) if mime.to_ascii_lowercase().starts_with("video/") => Ok(mime),
        other => {
            warn!("Rejected {} ({})", file_name, other.unwrap_or("unknown type"));
            Err(CutlineError::UnsupportedFormat(format!(
                "{file_name} is not a video file"
            )))
        }
    }
}

/// Guess a MIME type from a file extension.
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    Some(match ext.as_str() {
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "ogv" => "video/ogg",
        "mpeg" | "mpg" => "video/mpeg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => return None,
    })
}
