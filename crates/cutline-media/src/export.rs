//! Export settings, platform presets and size estimation.
//!
//! Nothing is encoded here. Requesting an export validates the settings and
//! returns an [`ExportRequest`] for whatever renderer the caller drives.

use std::fmt;
use std::str::FromStr;

use cutline_core::{CutlineError, RationalTime, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_FILE_NAME: &str = "mi-video-editado";

// ── Choices ─────────────────────────────────────────────────────

/// Output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Mp4,
    Webm,
    Mov,
    Avi,
    Mkv,
}

impl ContainerFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mov => "mov",
            Self::Avi => "avi",
            Self::Mkv => "mkv",
        }
    }
}

/// Video codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[default]
    H264,
    H265,
    Vp9,
    Av1,
    ProRes,
}

/// Audio codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    #[default]
    Aac,
    Mp3,
    Opus,
    Vorbis,
    Flac,
}

/// Export quality tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Ultra,
    #[default]
    High,
    Medium,
    Low,
}

impl Quality {
    /// Video bitrate (kbps) and frame rate a preset of this tier selects.
    pub fn preset_bitrate_and_fps(self) -> (u32, u32) {
        match self {
            Self::Ultra => (20_000, 60),
            Self::High => (10_000, 30),
            Self::Medium | Self::Low => (5_000, 30),
        }
    }
}

macro_rules! impl_lowercase_names {
    ($ty:ty, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $name,)+
                })
            }
        }

        impl FromStr for $ty {
            type Err = CutlineError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(CutlineError::InvalidParameter(format!(
                        concat!("unknown ", $what, ": {:?}"),
                        other
                    ))),
                }
            }
        }
    };
}

impl_lowercase_names!(ContainerFormat, "format", {
    Mp4 => "mp4", Webm => "webm", Mov => "mov", Avi => "avi", Mkv => "mkv",
});
impl_lowercase_names!(VideoCodec, "video codec", {
    H264 => "h264", H265 => "h265", Vp9 => "vp9", Av1 => "av1", ProRes => "prores",
});
impl_lowercase_names!(AudioCodec, "audio codec", {
    Aac => "aac", Mp3 => "mp3", Opus => "opus", Vorbis => "vorbis", Flac => "flac",
});
impl_lowercase_names!(Quality, "quality", {
    Ultra => "ultra", High => "high", Medium => "medium", Low => "low",
});

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const UHD_4K: Self = Self::new(3840, 2160);
    pub const QHD: Self = Self::new(2560, 1440);
    pub const FULL_HD: Self = Self::new(1920, 1080);
    pub const HD: Self = Self::new(1280, 720);
    pub const VERTICAL: Self = Self::new(1080, 1920);
    pub const SQUARE: Self = Self::new(1080, 1080);
    pub const SD: Self = Self::new(720, 480);

    /// Sizes offered by the export panel.
    pub const ALL: [Resolution; 7] = [
        Self::UHD_4K,
        Self::QHD,
        Self::FULL_HD,
        Self::HD,
        Self::VERTICAL,
        Self::SQUARE,
        Self::SD,
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = CutlineError;

    /// Parse `WIDTHxHEIGHT`; only the offered sizes are accepted.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CutlineError::InvalidParameter(format!("unsupported resolution: {s:?}"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let resolution = Self::new(
            w.trim().parse().map_err(|_| invalid())?,
            h.trim().parse().map_err(|_| invalid())?,
        );
        if Self::ALL.contains(&resolution) {
            Ok(resolution)
        } else {
            Err(invalid())
        }
    }
}

// ── Ranges ──────────────────────────────────────────────────────

/// An integer setting with an inclusive range and a step from `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteppedRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SteppedRange {
    /// Clamp into range and round to the nearest step.
    pub fn snap(self, value: u32) -> u32 {
        let clamped = value.clamp(self.min, self.max);
        let steps = (clamped - self.min + self.step / 2) / self.step;
        (self.min + steps * self.step).min(self.max)
    }
}

pub const FPS_RANGE: SteppedRange = SteppedRange {
    min: 24,
    max: 120,
    step: 6,
};
pub const BITRATE_RANGE: SteppedRange = SteppedRange {
    min: 1_000,
    max: 50_000,
    step: 1_000,
};
pub const AUDIO_BITRATE_RANGE: SteppedRange = SteppedRange {
    min: 128,
    max: 512,
    step: 32,
};

// ── Presets ─────────────────────────────────────────────────────

/// One-click settings for a target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportPreset {
    pub name: &'static str,
    pub platform: &'static str,
    pub resolution: Resolution,
    pub format: ContainerFormat,
    pub quality: Quality,
    pub description: &'static str,
}

pub const PRESETS: [ExportPreset; 6] = [
    ExportPreset {
        name: "YouTube",
        platform: "youtube",
        resolution: Resolution::FULL_HD,
        format: ContainerFormat::Mp4,
        quality: Quality::High,
        description: "Optimized for YouTube 1080p",
    },
    ExportPreset {
        name: "Instagram Feed",
        platform: "instagram-feed",
        resolution: Resolution::SQUARE,
        format: ContainerFormat::Mp4,
        quality: Quality::High,
        description: "Square format for the feed",
    },
    ExportPreset {
        name: "Instagram Story",
        platform: "instagram-story",
        resolution: Resolution::VERTICAL,
        format: ContainerFormat::Mp4,
        quality: Quality::Medium,
        description: "Vertical for stories",
    },
    ExportPreset {
        name: "TikTok",
        platform: "tiktok",
        resolution: Resolution::VERTICAL,
        format: ContainerFormat::Mp4,
        quality: Quality::High,
        description: "Optimized for TikTok",
    },
    ExportPreset {
        name: "Twitter/X",
        platform: "twitter",
        resolution: Resolution::HD,
        format: ContainerFormat::Mp4,
        quality: Quality::Medium,
        description: "Optimized for X (Twitter)",
    },
    ExportPreset {
        name: "4K Ultra HD",
        platform: "4k",
        resolution: Resolution::UHD_4K,
        format: ContainerFormat::Mp4,
        quality: Quality::Ultra,
        description: "Maximum 4K quality",
    },
];

/// Find a preset by platform key or display name (case-insensitive).
pub fn find_preset(key: &str) -> Option<&'static ExportPreset> {
    let key = key.trim();
    PRESETS
        .iter()
        .find(|p| p.platform.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
}

// ── Settings ────────────────────────────────────────────────────

/// Export panel state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: ContainerFormat,
    pub resolution: Resolution,
    pub quality: Quality,
    fps: u32,
    pub video_codec: VideoCodec,
    /// kbps
    bitrate: u32,
    pub audio_codec: AudioCodec,
    /// kbps
    audio_bitrate: u32,
    pub file_name: String,
    pub include_audio: bool,
    pub include_subtitles: bool,
    pub hardware_acceleration: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ContainerFormat::default(),
            resolution: Resolution::default(),
            quality: Quality::default(),
            fps: 30,
            video_codec: VideoCodec::default(),
            bitrate: 8_000,
            audio_codec: AudioCodec::default(),
            audio_bitrate: 320,
            file_name: DEFAULT_FILE_NAME.to_string(),
            include_audio: true,
            include_subtitles: false,
            hardware_acceleration: true,
        }
    }
}

impl ExportSettings {
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn bitrate(&self) -> u32 {
        self.bitrate
    }

    pub fn audio_bitrate(&self) -> u32 {
        self.audio_bitrate
    }

    /// Set the frame rate, snapped to 24..=120 in steps of 6.
    pub fn set_fps(&mut self, fps: u32) -> u32 {
        self.fps = FPS_RANGE.snap(fps);
        self.fps
    }

    /// Set the video bitrate in kbps, snapped to 1000..=50000 in steps of 1000.
    pub fn set_bitrate(&mut self, kbps: u32) -> u32 {
        self.bitrate = BITRATE_RANGE.snap(kbps);
        self.bitrate
    }

    /// Set the audio bitrate in kbps, snapped to 128..=512 in steps of 32.
    pub fn set_audio_bitrate(&mut self, kbps: u32) -> u32 {
        self.audio_bitrate = AUDIO_BITRATE_RANGE.snap(kbps);
        self.audio_bitrate
    }

    /// Take resolution, format and quality from a preset, plus the tier's bitrate and fps.
    pub fn apply_preset(&mut self, preset: &ExportPreset) {
        self.resolution = preset.resolution;
        self.format = preset.format;
        self.quality = preset.quality;
        let (bitrate, fps) = preset.quality.preset_bitrate_and_fps();
        self.bitrate = bitrate;
        self.fps = fps;
        debug!("Applied export preset '{}'", preset.name);
    }

    /// Estimated output size in megabytes for a timeline of `duration`.
    pub fn estimated_size_mb(&self, duration: RationalTime) -> f64 {
        let kbps = f64::from(self.bitrate) + f64::from(self.audio_bitrate);
        kbps * duration.to_seconds_f64().max(0.0) / (8.0 * 1024.0)
    }

    /// Output file name with the container's extension.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.file_name.trim(), self.format.extension())
    }

    /// Validate and produce the payload for the renderer.
    pub fn request(&self, duration: RationalTime) -> Result<ExportRequest> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(CutlineError::InvalidParameter(
                "export file name must not be empty".into(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(CutlineError::InvalidParameter(format!(
                "export file name must not contain a path separator: {name:?}"
            )));
        }
        if !duration.is_positive() {
            return Err(CutlineError::InvalidParameter(
                "nothing to export: timeline is empty".into(),
            ));
        }

        let request = ExportRequest {
            output_file: self.output_file_name(),
            settings: self.clone(),
            duration,
            estimated_size_mb: self.estimated_size_mb(duration),
        };
        info!(
            "Export requested: {} {} {}fps {}kbps (~{:.1} MB)",
            request.output_file,
            self.resolution,
            self.fps,
            self.bitrate,
            request.estimated_size_mb
        );
        Ok(request)
    }
}

/// What the caller should render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub output_file: String,
    pub settings: ExportSettings,
    pub duration: RationalTime,
    pub estimated_size_mb: f64,
}
