//! Subtitle overlay requests.

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 72;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleStyle {
    #[default]
    Classic,
    Bold,
    Outline,
    Boxed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitlePosition {
    Top,
    Center,
    #[default]
    Bottom,
}

/// A subtitle the caller should burn in or attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleRequest {
    pub text: String,
    pub style: SubtitleStyle,
    pub position: SubtitlePosition,
    /// Font size in pixels
    pub size: u32,
}

impl SubtitleRequest {
    /// Validate and build a request. Text is trimmed and must not be empty.
    pub fn new(
        text: &str,
        style: SubtitleStyle,
        position: SubtitlePosition,
        size: u32,
    ) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CutlineError::InvalidParameter(
                "subtitle text must not be empty".into(),
            ));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            return Err(CutlineError::InvalidParameter(format!(
                "subtitle size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}, got {size}"
            )));
        }
        info!("Subtitle requested ({:?}, {:?}, {}px)", style, position, size);
        Ok(Self {
            text: text.to_string(),
            style,
            position,
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req =
            SubtitleRequest::new("  Hello  ", SubtitleStyle::Bold, SubtitlePosition::Top, 24)
                .unwrap();
        assert_eq!(req.text, "Hello");
        assert_eq!(req.position, SubtitlePosition::Top);
    }

    #[test]
    fn test_rejects_empty_and_size() {
        let d = SubtitlePosition::default();
        assert_eq!(d, SubtitlePosition::Bottom);
        assert!(SubtitleRequest::new("   ", SubtitleStyle::Classic, d, 24).is_err());
        assert!(SubtitleRequest::new("hi", SubtitleStyle::Classic, d, 11).is_err());
        assert!(SubtitleRequest::new("hi", SubtitleStyle::Classic, d, 73).is_err());
        assert!(SubtitleRequest::new("hi", SubtitleStyle::Classic, d, 72).is_ok());
    }
}
