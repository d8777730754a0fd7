//! Track types for the timeline.

use cutline_core::{Color, CutlineError, RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::clip::Clip;

/// Kind of track (and of the clips it holds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Effect,
}

impl TrackKind {
    pub const ALL: [TrackKind; 4] = [Self::Video, Self::Audio, Self::Text, Self::Effect];

    /// Capitalized label used for generated track names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
            Self::Effect => "Effect",
        }
    }

    /// Default clip color for this kind.
    pub fn default_color(self) -> Color {
        match self {
            Self::Video => Color::VIOLET,
            Self::Audio => Color::EMERALD,
            Self::Text => Color::BLUE,
            Self::Effect => Color::AMBER,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Effect => "effect",
        })
    }
}

impl FromStr for TrackKind {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "text" => Ok(Self::Text),
            "effect" | "effects" => Ok(Self::Effect),
            other => Err(CutlineError::InvalidParameter(format!(
                "unknown track kind: {other:?}"
            ))),
        }
    }
}

/// A lane of clips of one kind.
///
/// Clips keep insertion order; they are not required to be sorted or
/// contiguous. Overlap rules are enforced by the owning timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Clips in this track
    pub clips: Vec<Clip>,
    /// Is track muted
    pub muted: bool,
    /// Is track locked (prevent edits)
    pub locked: bool,
    /// Is track visible
    pub visible: bool,
}

impl Track {
    /// Create a new empty track.
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, name)
    }

    /// Create a new empty track with a known id.
    pub fn with_id(id: Uuid, kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            clips: Vec::new(),
            muted: false,
            locked: false,
            visible: true,
        }
    }

    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Video, name)
    }

    /// End of the last clip, or zero for an empty track.
    pub fn duration(&self) -> RationalTime {
        self.clips
            .iter()
            .map(Clip::end)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Add a clip to the end of the clip list.
    pub fn append_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Insert a clip at the given index.
    pub fn insert_clip(&mut self, index: usize, clip: Clip) {
        let index = index.min(self.clips.len());
        self.clips.insert(index, clip);
    }

    /// Remove the clip at the given index.
    pub fn remove_clip_at(&mut self, index: usize) -> Option<Clip> {
        if index < self.clips.len() {
            Some(self.clips.remove(index))
        } else {
            None
        }
    }

    /// Find a clip by UUID. Returns (index, &Clip).
    pub fn find_clip(&self, id: Uuid) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id == id)
    }

    /// Indices of clips covering the given time.
    pub fn clips_at_time(&self, time: RationalTime) -> SmallVec<[usize; 4]> {
        self.clips
            .iter()
            .enumerate()
            .filter(|(_, clip)| clip.range().contains(time))
            .map(|(i, _)| i)
            .collect()
    }

    /// First clip intersecting `range`, ignoring the clip with id `exclude`.
    pub fn first_overlap(&self, range: TimeRange, exclude: Option<Uuid>) -> Option<&Clip> {
        self.clips
            .iter()
            .filter(|clip| Some(clip.id) != exclude)
            .find(|clip| clip.range().overlaps(range))
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Whether the track holds no clips.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
