//! Cutline Media - Import validation, playback transport and export settings
//!
//! Provides:
//! - `MediaImport`: accepts video files by MIME type
//! - `Player`: play/pause/seek/volume state of the preview
//! - `ExportSettings`: format, codecs, bitrates, platform presets and size estimate

pub mod export;
pub mod import;
pub mod player;

pub use export::{
    find_preset, AudioCodec, ContainerFormat, ExportPreset, ExportRequest, ExportSettings,
    Quality, Resolution, VideoCodec, PRESETS,
};
pub use import::{guess_mime, MediaImport};
pub use player::Player;
