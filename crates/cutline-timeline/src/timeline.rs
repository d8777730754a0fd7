//! The multitrack timeline and its clip operations.

use cutline_core::{CutlineError, RationalTime, Result, TimeRange};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clip::{validate_placement, Clip};
use crate::track::{Track, TrackKind};

/// How clips on the same track may relate in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// No collision checks.
    #[default]
    Allow,
    /// Inserting, duplicating or moving a clip onto another clip fails.
    Reject,
}

/// Per-track boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackFlag {
    Muted,
    Locked,
    Visible,
}

/// Where a clip lives: track index and position within the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipLocation {
    pub track_index: usize,
    pub position: usize,
}

/// A set of tracks plus ruler markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Timeline name
    pub name: String,
    /// Length of the imported media; bounds the ruler and seeking
    pub duration: RationalTime,
    /// Tracks, top to bottom
    pub tracks: Vec<Track>,
    /// Marker times in insertion order
    pub markers: Vec<RationalTime>,
    /// Collision rule for clips on one track
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
    /// Distance between a clip's end and its duplicate's start
    #[serde(default = "default_duplicate_gap")]
    pub duplicate_gap: RationalTime,
}

fn default_duplicate_gap() -> RationalTime {
    RationalTime::new(1, 2)
}

impl Timeline {
    /// Create a timeline with the default video, audio and text tracks.
    pub fn new(name: impl Into<String>) -> Self {
        let mut timeline = Self::empty(name);
        timeline.tracks = vec![
            Track::new(TrackKind::Video, "Main Video"),
            Track::new(TrackKind::Audio, "Main Audio"),
            Track::new(TrackKind::Text, "Text & Titles"),
        ];
        timeline
    }

    /// Create a timeline without tracks.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: RationalTime::ZERO,
            tracks: Vec::new(),
            markers: Vec::new(),
            overlap_policy: OverlapPolicy::default(),
            duplicate_gap: default_duplicate_gap(),
        }
    }

    /// Builder-style overlap policy.
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    // ── Media import ─────────────────────────────────────────────

    /// Register imported media of the given duration.
    ///
    /// Sets the timeline duration. When the first video track has no clips,
    /// seeds one video clip and one audio clip at time zero spanning the whole
    /// media, and returns their ids.
    pub fn import_media(
        &mut self,
        file_name: &str,
        duration: RationalTime,
    ) -> Result<Option<(Uuid, Uuid)>> {
        validate_placement(RationalTime::ZERO, duration)?;

        let video_index = self.first_track_of(TrackKind::Video).ok_or_else(|| {
            CutlineError::Timeline("timeline has no video track to import into".into())
        })?;
        let audio_index = self.first_track_of(TrackKind::Audio).ok_or_else(|| {
            CutlineError::Timeline("timeline has no audio track to import into".into())
        })?;

        if !self.tracks[video_index].is_empty() {
            debug!("Video track already populated; not seeding clips for {}", file_name);
            self.duration = duration;
            return Ok(None);
        }

        let mut video = Clip::new(TrackKind::Video, file_name, RationalTime::ZERO, duration)?;
        let mut audio = Clip::new(
            TrackKind::Audio,
            format!("{file_name} (Audio)"),
            RationalTime::ZERO,
            duration,
        )?;
        video.track_index = video_index;
        audio.track_index = audio_index;
        let ids = (video.id, audio.id);

        // Audio lane may already hold clips from an earlier session.
        if self.overlap_policy == OverlapPolicy::Reject {
            self.check_overlap(audio_index, audio.range(), None)?;
        }
        self.duration = duration;
        self.tracks[video_index].append_clip(video);
        self.tracks[audio_index].append_clip(audio);

        info!("Imported {} ({})", file_name, duration);
        Ok(Some(ids))
    }

    // ── Tracks ───────────────────────────────────────────────────

    /// Add a track named `"<Kind> <n>"`, n being the count of that kind plus one.
    pub fn add_track(&mut self, kind: TrackKind) -> Uuid {
        self.add_track_with_id(kind, Uuid::new_v4())
    }

    /// Add a generated-name track with a known id.
    pub fn add_track_with_id(&mut self, kind: TrackKind, id: Uuid) -> Uuid {
        let count = self.tracks.iter().filter(|t| t.kind == kind).count();
        let name = format!("{} {}", kind.label(), count + 1);
        debug!("Adding {} track '{}'", kind, name);
        self.tracks.push(Track::with_id(id, kind, name));
        id
    }

    /// Insert a whole track at `index` (clamped), reindexing clips.
    pub fn insert_track(&mut self, index: usize, track: Track) -> Result<()> {
        if self.track_index(track.id).is_some() {
            return Err(CutlineError::InvalidParameter(format!(
                "track {} already exists",
                track.id
            )));
        }
        let index = index.min(self.tracks.len());
        self.tracks.insert(index, track);
        self.reindex_from(index);
        Ok(())
    }

    /// Remove a track by id, returning its former index and the track.
    pub fn remove_track(&mut self, track_id: Uuid) -> Result<(usize, Track)> {
        let index = self.track_index(track_id).ok_or_else(|| track_not_found(track_id))?;
        let track = self.tracks.remove(index);
        self.reindex_from(index);
        debug!("Removed track '{}' with {} clips", track.name, track.clip_count());
        Ok((index, track))
    }

    /// Find a track index by UUID.
    pub fn track_index(&self, track_id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Find a track by UUID.
    pub fn track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Flip a track flag, returning its new value.
    pub fn toggle_track_flag(&mut self, track_id: Uuid, flag: TrackFlag) -> Result<bool> {
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or_else(|| track_not_found(track_id))?;
        let value = match flag {
            TrackFlag::Muted => &mut track.muted,
            TrackFlag::Locked => &mut track.locked,
            TrackFlag::Visible => &mut track.visible,
        };
        *value = !*value;
        Ok(*value)
    }

    fn first_track_of(&self, kind: TrackKind) -> Option<usize> {
        self.tracks.iter().position(|t| t.kind == kind)
    }

    fn reindex_from(&mut self, from: usize) {
        for (index, track) in self.tracks.iter_mut().enumerate().skip(from) {
            for clip in &mut track.clips {
                clip.track_index = index;
            }
        }
    }

    // ── Clip lookup ──────────────────────────────────────────────

    /// Locate a clip by id.
    pub fn locate(&self, clip_id: Uuid) -> Option<ClipLocation> {
        self.tracks.iter().enumerate().find_map(|(track_index, track)| {
            track.find_clip(clip_id).map(|(position, _)| ClipLocation {
                track_index,
                position,
            })
        })
    }

    /// Get a clip by id.
    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.tracks
            .iter()
            .find_map(|track| track.find_clip(clip_id).map(|(_, clip)| clip))
    }

    /// All clips under the given time, top track first.
    pub fn clips_at(&self, time: RationalTime) -> SmallVec<[ClipLocation; 4]> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(track_index, track)| {
                track
                    .clips_at_time(time)
                    .into_iter()
                    .map(move |position| ClipLocation {
                        track_index,
                        position,
                    })
            })
            .collect()
    }

    /// End of the latest clip on any track.
    pub fn content_end(&self) -> RationalTime {
        self.tracks
            .iter()
            .map(Track::duration)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Total number of clips on all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(Track::clip_count).sum()
    }

    // ── Clip operations ──────────────────────────────────────────

    /// Insert a clip on a track at `position` (or the end).
    ///
    /// The clip kind must match the track kind; the track must not be locked.
    pub fn insert_clip(
        &mut self,
        track_index: usize,
        position: Option<usize>,
        mut clip: Clip,
    ) -> Result<()> {
        validate_placement(clip.start, clip.duration)?;
        let track = self
            .tracks
            .get(track_index)
            .ok_or_else(|| CutlineError::NotFound(format!("track index {track_index}")))?;
        if track.locked {
            return Err(CutlineError::Locked(format!("track '{}'", track.name)));
        }
        if track.kind != clip.kind {
            return Err(CutlineError::InvalidParameter(format!(
                "cannot place a {} clip on {} track '{}'",
                clip.kind, track.kind, track.name
            )));
        }
        if self.locate(clip.id).is_some() {
            return Err(CutlineError::InvalidParameter(format!(
                "clip {} is already on the timeline",
                clip.id
            )));
        }
        self.check_overlap(track_index, clip.range(), None)?;

        clip.track_index = track_index;
        let track = &mut self.tracks[track_index];
        match position {
            Some(position) => track.insert_clip(position, clip),
            None => track.append_clip(clip),
        }
        Ok(())
    }

    /// Split a clip at an absolute time; the two parts replace it in place.
    pub fn split_clip(&mut self, clip_id: Uuid, at: RationalTime) -> Result<(Uuid, Uuid)> {
        self.split_clip_with_ids(clip_id, at, Uuid::new_v4(), Uuid::new_v4())
    }

    /// Split using pre-assigned ids for the two parts.
    pub fn split_clip_with_ids(
        &mut self,
        clip_id: Uuid,
        at: RationalTime,
        left_id: Uuid,
        right_id: Uuid,
    ) -> Result<(Uuid, Uuid)> {
        let loc = self.editable(clip_id)?;
        let original = &self.tracks[loc.track_index].clips[loc.position];
        let (left, right) = original.split_at_with_ids(at, left_id, right_id)?;

        debug!("Split '{}' at {}", original.name, at);
        let clips = &mut self.tracks[loc.track_index].clips;
        clips.splice(loc.position..=loc.position, [left, right]);
        Ok((left_id, right_id))
    }

    /// Undo a split: replace the two parts with the original clip.
    pub fn join_split(&mut self, left_id: Uuid, right_id: Uuid, original: Clip) -> Result<()> {
        let left = self.locate(left_id).ok_or_else(|| clip_not_found(left_id))?;
        let right = self.locate(right_id).ok_or_else(|| clip_not_found(right_id))?;
        if left.track_index != right.track_index {
            return Err(CutlineError::Timeline(
                "split parts live on different tracks".into(),
            ));
        }

        let clips = &mut self.tracks[left.track_index].clips;
        clips.remove(right.position);
        let position = if right.position < left.position {
            left.position - 1
        } else {
            left.position
        };
        clips[position] = Clip {
            track_index: left.track_index,
            ..original
        };
        Ok(())
    }

    /// Duplicate a clip right after itself (end + gap), appended to its track.
    pub fn duplicate_clip(&mut self, clip_id: Uuid) -> Result<Uuid> {
        self.duplicate_clip_with_id(clip_id, Uuid::new_v4())
    }

    /// Duplicate using a pre-assigned id for the copy.
    pub fn duplicate_clip_with_id(&mut self, clip_id: Uuid, new_id: Uuid) -> Result<Uuid> {
        let loc = self.editable(clip_id)?;
        let source = &self.tracks[loc.track_index].clips[loc.position];
        let start = source.end().checked_add(self.duplicate_gap).ok_or_else(|| {
            CutlineError::InvalidParameter(format!("no room to duplicate '{}'", source.name))
        })?;
        validate_placement(start, source.duration)?;
        let copy = source.duplicate_at(start, new_id);
        self.check_overlap(loc.track_index, copy.range(), None)?;

        debug!("Duplicated '{}' at {}", copy.name, copy.start);
        self.tracks[loc.track_index].append_clip(copy);
        Ok(new_id)
    }

    /// Delete a clip, returning where it was and the clip itself.
    pub fn delete_clip(&mut self, clip_id: Uuid) -> Result<(ClipLocation, Clip)> {
        self.editable(clip_id)?;
        self.take_clip(clip_id)
    }

    /// Remove a clip without lock checks.
    pub(crate) fn take_clip(&mut self, clip_id: Uuid) -> Result<(ClipLocation, Clip)> {
        let loc = self.locate(clip_id).ok_or_else(|| clip_not_found(clip_id))?;
        let clip = self.tracks[loc.track_index].clips.remove(loc.position);
        debug!("Removed clip '{}'", clip.name);
        Ok((loc, clip))
    }

    /// Put a previously removed clip back where it was, without lock checks.
    pub(crate) fn restore_clip(&mut self, loc: ClipLocation, mut clip: Clip) -> Result<()> {
        let track = self
            .tracks
            .get_mut(loc.track_index)
            .ok_or_else(|| CutlineError::NotFound(format!("track index {}", loc.track_index)))?;
        clip.track_index = loc.track_index;
        track.insert_clip(loc.position, clip);
        Ok(())
    }

    /// Reposition a clip. The start is clamped to zero; returns the applied start.
    pub fn move_clip(&mut self, clip_id: Uuid, proposed_start: RationalTime) -> Result<RationalTime> {
        let loc = self.editable(clip_id)?;
        self.place_clip(loc, proposed_start)
    }

    /// Reposition a clip without lock checks.
    pub(crate) fn reset_clip_start(
        &mut self,
        clip_id: Uuid,
        start: RationalTime,
    ) -> Result<RationalTime> {
        let loc = self.locate(clip_id).ok_or_else(|| clip_not_found(clip_id))?;
        self.place_clip(loc, start)
    }

    fn place_clip(&mut self, loc: ClipLocation, proposed_start: RationalTime) -> Result<RationalTime> {
        let clip = &self.tracks[loc.track_index].clips[loc.position];
        let start = proposed_start.max(RationalTime::ZERO);
        validate_placement(start, clip.duration)?;
        self.check_overlap(
            loc.track_index,
            TimeRange::new(start, clip.duration),
            Some(clip.id),
        )?;

        let clip = &mut self.tracks[loc.track_index].clips[loc.position];
        Ok(clip.move_to(start))
    }

    /// Lock or unlock a single clip.
    pub fn set_clip_locked(&mut self, clip_id: Uuid, locked: bool) -> Result<()> {
        let loc = self.locate(clip_id).ok_or_else(|| clip_not_found(clip_id))?;
        self.tracks[loc.track_index].clips[loc.position].locked = locked;
        Ok(())
    }

    /// Check stored times: every clip placement is valid, and the duration,
    /// markers and duplicate gap are not negative.
    pub fn validate(&self) -> Result<()> {
        for clip in self.tracks.iter().flat_map(|t| &t.clips) {
            validate_placement(clip.start, clip.duration).map_err(|e| {
                CutlineError::Timeline(format!("clip '{}' ({}): {e}", clip.name, clip.id))
            })?;
        }
        let negative = [self.duration, self.duplicate_gap]
            .into_iter()
            .chain(self.markers.iter().copied())
            .find(|t| t.is_negative());
        match negative {
            Some(time) => Err(CutlineError::Timeline(format!("negative time {time}"))),
            None => Ok(()),
        }
    }

    /// Locate a clip that may be edited: neither it nor its track is locked.
    fn editable(&self, clip_id: Uuid) -> Result<ClipLocation> {
        let loc = self.locate(clip_id).ok_or_else(|| clip_not_found(clip_id))?;
        let track = &self.tracks[loc.track_index];
        let clip = &track.clips[loc.position];
        if clip.locked {
            warn!("Rejected edit of locked clip '{}'", clip.name);
            return Err(CutlineError::Locked(format!("clip '{}'", clip.name)));
        }
        if track.locked {
            warn!("Rejected edit on locked track '{}'", track.name);
            return Err(CutlineError::Locked(format!("track '{}'", track.name)));
        }
        Ok(loc)
    }

    fn check_overlap(&self, track_index: usize, range: TimeRange, exclude: Option<Uuid>) -> Result<()> {
        if self.overlap_policy == OverlapPolicy::Allow {
            return Ok(());
        }
        match self.tracks[track_index].first_overlap(range, exclude) {
            Some(other) => {
                warn!("Rejected overlap with '{}'", other.name);
                Err(CutlineError::Overlap(format!(
                    "{} .. {} intersects clip '{}'",
                    range.start,
                    range.end(),
                    other.name
                )))
            }
            None => Ok(()),
        }
    }

    // ── Markers ──────────────────────────────────────────────────

    /// Pin a marker at `time`.
    pub fn add_marker(&mut self, time: RationalTime) -> Result<()> {
        if time.is_negative() {
            return Err(CutlineError::InvalidParameter(format!(
                "marker time must not be negative, got {time}"
            )));
        }
        self.markers.push(time);
        Ok(())
    }

    /// Remove every marker at exactly `time`; returns how many were removed.
    pub fn remove_marker(&mut self, time: RationalTime) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| *m != time);
        before - self.markers.len()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

fn clip_not_found(clip_id: Uuid) -> CutlineError {
    CutlineError::NotFound(format!("clip {clip_id}"))
}

fn track_not_found(track_id: Uuid) -> CutlineError {
    CutlineError::NotFound(format!("track {track_id}"))
}
