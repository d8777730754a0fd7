//! Audio mixer: per-track volume, mute/solo and effect settings.

use std::fmt;
use std::str::FromStr;

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::library;

pub const MAX_VOLUME: f32 = 100.0;
/// Volume given to tracks added by hand.
pub const DEFAULT_VOLUME: f32 = 75.0;
/// Volume and fades given to tracks added from the music library.
pub const LIBRARY_VOLUME: f32 = 50.0;
pub const LIBRARY_FADE_SECS: f32 = 2.0;

/// Content of a mixer track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixerTrackKind {
    Voice,
    Music,
    Sfx,
}

impl MixerTrackKind {
    fn new_track_name(self) -> &'static str {
        match self {
            Self::Voice => "New Voice Track",
            Self::Music => "New Music Track",
            Self::Sfx => "New Effects Track",
        }
    }
}

/// Three-band equalizer gains in dB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Equalizer {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

/// Effect settings of one mixer track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackEffects {
    /// Seconds
    pub fade_in: f32,
    /// Seconds
    pub fade_out: f32,
    pub eq: Equalizer,
    /// Percent
    pub noise_reduction: f32,
    pub normalized: bool,
}

/// A numeric effect parameter of a mixer track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectParam {
    FadeIn,
    FadeOut,
    EqLow,
    EqMid,
    EqHigh,
    NoiseReduction,
}

impl EffectParam {
    pub const ALL: [EffectParam; 6] = [
        Self::FadeIn,
        Self::FadeOut,
        Self::EqLow,
        Self::EqMid,
        Self::EqHigh,
        Self::NoiseReduction,
    ];

    /// Inclusive value range.
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::FadeIn | Self::FadeOut => (0.0, 10.0),
            Self::EqLow | Self::EqMid | Self::EqHigh => (-12.0, 12.0),
            Self::NoiseReduction => (0.0, 100.0),
        }
    }

    fn slot(self, effects: &mut TrackEffects) -> &mut f32 {
        match self {
            Self::FadeIn => &mut effects.fade_in,
            Self::FadeOut => &mut effects.fade_out,
            Self::EqLow => &mut effects.eq.low,
            Self::EqMid => &mut effects.eq.mid,
            Self::EqHigh => &mut effects.eq.high,
            Self::NoiseReduction => &mut effects.noise_reduction,
        }
    }

    /// Read this parameter from a set of effects.
    pub fn get(self, effects: &TrackEffects) -> f32 {
        let mut copy = *effects;
        *self.slot(&mut copy)
    }
}

impl fmt::Display for EffectParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FadeIn => "fade-in",
            Self::FadeOut => "fade-out",
            Self::EqLow => "eq.low",
            Self::EqMid => "eq.mid",
            Self::EqHigh => "eq.high",
            Self::NoiseReduction => "noise-reduction",
        })
    }
}

impl FromStr for EffectParam {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "fade-in" | "fadein" => Ok(Self::FadeIn),
            "fade-out" | "fadeout" => Ok(Self::FadeOut),
            "eq.low" => Ok(Self::EqLow),
            "eq.mid" => Ok(Self::EqMid),
            "eq.high" => Ok(Self::EqHigh),
            "noise-reduction" | "noisereduction" => Ok(Self::NoiseReduction),
            _ => Err(CutlineError::InvalidParameter(format!(
                "unknown effect parameter: {s:?}"
            ))),
        }
    }
}

/// One mixer channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerTrack {
    pub id: Uuid,
    pub name: String,
    pub kind: MixerTrackKind,
    /// 0 to 100
    pub volume: f32,
    pub muted: bool,
    pub solo: bool,
    pub effects: TrackEffects,
}

impl MixerTrack {
    pub fn new(kind: MixerTrackKind, name: impl Into<String>, volume: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            volume: volume.clamp(0.0, MAX_VOLUME),
            muted: false,
            solo: false,
            effects: TrackEffects::default(),
        }
    }

    fn with_fades(mut self, seconds: f32) -> Self {
        self.effects.fade_in = seconds;
        self.effects.fade_out = seconds;
        self
    }
}

/// The mixer panel: tracks, selection and master level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMixer {
    tracks: Vec<MixerTrack>,
    selected: Option<Uuid>,
    /// Master volume (0.0 to 1.0).
    master_volume: f32,
}

impl AudioMixer {
    /// A mixer with the default narration and background music tracks.
    pub fn new() -> Self {
        let tracks = vec![
            MixerTrack::new(MixerTrackKind::Voice, "Main Narration", DEFAULT_VOLUME),
            MixerTrack::new(MixerTrackKind::Music, "Background Music", LIBRARY_VOLUME)
                .with_fades(LIBRARY_FADE_SECS),
        ];
        let selected = tracks.first().map(|t| t.id);
        Self {
            tracks,
            selected,
            master_volume: 1.0,
        }
    }

    /// A mixer with no tracks.
    pub fn empty() -> Self {
        Self {
            tracks: Vec::new(),
            selected: None,
            master_volume: 1.0,
        }
    }

    pub fn tracks(&self) -> &[MixerTrack] {
        &self.tracks
    }

    pub fn track(&self, id: Uuid) -> Option<&MixerTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }

    fn track_mut(&mut self, id: Uuid) -> Result<&mut MixerTrack> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CutlineError::NotFound(format!("mixer track {id}")))
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: Uuid) -> Result<()> {
        self.track_mut(id)?;
        self.selected = Some(id);
        Ok(())
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) -> Result<f32> {
        self.master_volume = finite(volume)?.clamp(0.0, 1.0);
        Ok(self.master_volume)
    }

    // ── Channel controls ─────────────────────────────────────────

    /// Set a track's volume, clamped to 0..=100. Returns the stored value.
    pub fn set_volume(&mut self, id: Uuid, volume: f32) -> Result<f32> {
        let volume = finite(volume)?.clamp(0.0, MAX_VOLUME);
        self.track_mut(id)?.volume = volume;
        Ok(volume)
    }

    pub fn toggle_mute(&mut self, id: Uuid) -> Result<bool> {
        let track = self.track_mut(id)?;
        track.muted = !track.muted;
        Ok(track.muted)
    }

    pub fn toggle_solo(&mut self, id: Uuid) -> Result<bool> {
        let track = self.track_mut(id)?;
        track.solo = !track.solo;
        Ok(track.solo)
    }

    /// Set one effect parameter, clamped to its range. Returns the stored value.
    pub fn set_effect(&mut self, id: Uuid, param: EffectParam, value: f32) -> Result<f32> {
        let (min, max) = param.range();
        let value = finite(value)?.clamp(min, max);
        let track = self.track_mut(id)?;
        *param.slot(&mut track.effects) = value;
        debug!("Set {} on '{}' to {}", param, track.name, value);
        Ok(value)
    }

    pub fn set_normalized(&mut self, id: Uuid, normalized: bool) -> Result<()> {
        self.track_mut(id)?.effects.normalized = normalized;
        Ok(())
    }

    // ── Track list ───────────────────────────────────────────────

    /// Append a new track of `kind` and select it.
    pub fn add_track(&mut self, kind: MixerTrackKind) -> Uuid {
        let track = MixerTrack::new(kind, kind.new_track_name(), DEFAULT_VOLUME);
        let id = track.id;
        self.tracks.push(track);
        self.selected = Some(id);
        id
    }

    /// Remove a track. If it was selected, selection moves to the first remaining track.
    pub fn remove_track(&mut self, id: Uuid) -> Result<MixerTrack> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CutlineError::NotFound(format!("mixer track {id}")))?;
        let removed = self.tracks.remove(index);
        if self.selected == Some(id) {
            self.selected = self.tracks.first().map(|t| t.id);
        }
        debug!("Removed mixer track '{}'", removed.name);
        Ok(removed)
    }

    /// Replace a track with a voice track and a music track carrying its
    /// volume and effects, appended at the end. Returns (voice, music) ids.
    pub fn separate_voice_music(&mut self, id: Uuid) -> Result<(Uuid, Uuid)> {
        let source = self.remove_track(id)?;

        let mut voice = MixerTrack::new(
            MixerTrackKind::Voice,
            format!("{} (Voice)", source.name),
            source.volume,
        );
        voice.effects = source.effects;
        let mut music = MixerTrack::new(
            MixerTrackKind::Music,
            format!("{} (Music)", source.name),
            source.volume,
        );
        music.effects = source.effects;

        let ids = (voice.id, music.id);
        self.tracks.push(voice);
        self.tracks.push(music);
        info!("Separated '{}' into voice and music", source.name);
        Ok(ids)
    }

    /// Add a music library entry as a new music track.
    pub fn add_from_library(&mut self, item_id: &str) -> Result<Uuid> {
        let item = library::find(item_id)
            .ok_or_else(|| CutlineError::NotFound(format!("library item {item_id:?}")))?;
        let track = MixerTrack::new(MixerTrackKind::Music, item.name, LIBRARY_VOLUME)
            .with_fades(LIBRARY_FADE_SECS);
        let id = track.id;
        self.tracks.push(track);
        info!("Added '{}' by {} from the music library", item.name, item.artist);
        Ok(id)
    }

    // ── Audibility ───────────────────────────────────────────────

    /// Check if any track is soloed.
    fn any_solo(&self) -> bool {
        self.tracks.iter().any(|t| t.solo)
    }

    /// A muted track is silent; when any track is soloed only soloed tracks play.
    pub fn is_audible(&self, id: Uuid) -> bool {
        let has_solo = self.any_solo();
        self.track(id)
            .is_some_and(|t| !t.muted && (!has_solo || t.solo))
    }

    /// Linear gain of a track after mute/solo and master volume.
    pub fn effective_gain(&self, id: Uuid) -> f32 {
        match self.track(id) {
            Some(track) if self.is_audible(id) => track.volume / MAX_VOLUME * self.master_volume,
            _ => 0.0,
        }
    }
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CutlineError::InvalidParameter(format!(
            "expected a finite number, got {value}"
        )))
    }
}
