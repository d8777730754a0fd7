//! Edit operations with undo/redo support.
//!
//! Uses the Command pattern: every mutation is an `EditCommand` that knows
//! how to apply itself and produce its inverse for undo. Commands that create
//! objects carry their ids up front, so redoing them recreates the same ids
//! and later commands in the history keep pointing at the right clips.

use cutline_core::{CutlineError, RationalTime, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clip::Clip;
use crate::timeline::{ClipLocation, Timeline, TrackFlag};
use crate::track::{Track, TrackKind};

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit operation on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditCommand {
    /// Insert a clip on a track at `position`, or at the end.
    InsertClip {
        track_index: usize,
        position: Option<usize>,
        clip: Clip,
    },
    /// Delete a clip (lock-checked).
    DeleteClip {
        clip_id: Uuid,
        /// Stored for undo, populated when the command is executed.
        removed: Option<(ClipLocation, Clip)>,
    },
    /// Remove a clip regardless of locks. Used to take back an insert.
    RemoveClip {
        clip_id: Uuid,
        removed: Option<(ClipLocation, Clip)>,
    },
    /// Put a clip back at an exact location.
    RestoreClip { location: ClipLocation, clip: Clip },
    /// Split a clip at an absolute time into `left_id` and `right_id`.
    SplitClip {
        clip_id: Uuid,
        at: RationalTime,
        left_id: Uuid,
        right_id: Uuid,
        /// Stored for undo.
        original: Option<Clip>,
    },
    /// Merge two split halves back into the original clip.
    JoinClips {
        left_id: Uuid,
        right_id: Uuid,
        at: RationalTime,
        original: Clip,
    },
    /// Duplicate a clip, giving the copy `new_id`.
    DuplicateClip { clip_id: Uuid, new_id: Uuid },
    /// Move a clip to a new start time (clamped at zero).
    MoveClip {
        clip_id: Uuid,
        new_start: RationalTime,
        /// Start before the move, populated when executed.
        old_start: Option<RationalTime>,
    },
    /// Put a clip at `start` regardless of locks. Used to take back a move.
    ResetClipStart {
        clip_id: Uuid,
        start: RationalTime,
        /// Start before the reset, populated when executed.
        previous: Option<RationalTime>,
    },
    /// Add a generated-name track.
    AddTrack { kind: TrackKind, track_id: Uuid },
    /// Remove a track by ID.
    RemoveTrack {
        track_id: Uuid,
        /// Stored for undo: former index and the track with its clips.
        removed: Option<(usize, Track)>,
    },
    /// Re-insert a whole track at `index`.
    RestoreTrack { index: usize, track: Track },
    /// Flip a mute/lock/visibility flag.
    ToggleTrackFlag { track_id: Uuid, flag: TrackFlag },
    /// A batch of commands applied atomically.
    Batch(Vec<EditCommand>),
}

impl EditCommand {
    /// Apply this command to a timeline, mutating it in place.
    ///
    /// Mutable `&mut self` because some variants store data during execution
    /// (e.g., `DeleteClip` stores the removed clip for undo). On error the
    /// timeline is left as it was.
    pub fn apply(&mut self, timeline: &mut Timeline) -> Result<()> {
        match self {
            Self::InsertClip {
                track_index,
                position,
                clip,
            } => timeline.insert_clip(*track_index, *position, clip.clone()),
            Self::DeleteClip { clip_id, removed } => {
                *removed = Some(timeline.delete_clip(*clip_id)?);
                Ok(())
            }
            Self::RemoveClip { clip_id, removed } => {
                *removed = Some(timeline.take_clip(*clip_id)?);
                Ok(())
            }
            Self::RestoreClip { location, clip } => timeline.restore_clip(*location, clip.clone()),
            Self::SplitClip {
                clip_id,
                at,
                left_id,
                right_id,
                original,
            } => {
                let before = timeline
                    .clip(*clip_id)
                    .cloned()
                    .ok_or_else(|| CutlineError::NotFound(format!("clip {clip_id}")))?;
                timeline.split_clip_with_ids(*clip_id, *at, *left_id, *right_id)?;
                *original = Some(before);
                Ok(())
            }
            Self::JoinClips {
                left_id,
                right_id,
                original,
                ..
            } => timeline.join_split(*left_id, *right_id, original.clone()),
            Self::DuplicateClip { clip_id, new_id } => {
                timeline.duplicate_clip_with_id(*clip_id, *new_id)?;
                Ok(())
            }
            Self::MoveClip {
                clip_id,
                new_start,
                old_start,
            } => {
                let before = timeline
                    .clip(*clip_id)
                    .map(|clip| clip.start)
                    .ok_or_else(|| CutlineError::NotFound(format!("clip {clip_id}")))?;
                timeline.move_clip(*clip_id, *new_start)?;
                *old_start = Some(before);
                Ok(())
            }
            Self::ResetClipStart {
                clip_id,
                start,
                previous,
            } => {
                let before = timeline
                    .clip(*clip_id)
                    .map(|clip| clip.start)
                    .ok_or_else(|| CutlineError::NotFound(format!("clip {clip_id}")))?;
                timeline.reset_clip_start(*clip_id, *start)?;
                *previous = Some(before);
                Ok(())
            }
            Self::AddTrack { kind, track_id } => {
                if timeline.track_index(*track_id).is_some() {
                    return Err(CutlineError::InvalidParameter(format!(
                        "track {track_id} already exists"
                    )));
                }
                timeline.add_track_with_id(*kind, *track_id);
                Ok(())
            }
            Self::RemoveTrack { track_id, removed } => {
                *removed = Some(timeline.remove_track(*track_id)?);
                Ok(())
            }
            Self::RestoreTrack { index, track } => timeline.insert_track(*index, track.clone()),
            Self::ToggleTrackFlag { track_id, flag } => {
                timeline.toggle_track_flag(*track_id, *flag)?;
                Ok(())
            }
            Self::Batch(commands) => {
                let snapshot = timeline.clone();
                for cmd in commands.iter_mut() {
                    if let Err(e) = cmd.apply(timeline) {
                        *timeline = snapshot;
                        return Err(e);
                    }
                }
                Ok(())
            }
        }
    }

    /// Produce the inverse command (for undo).
    ///
    /// Commands that capture state during `apply` fail here until they have
    /// been applied.
    pub fn inverse(&self) -> Result<Self> {
        Ok(match self {
            Self::InsertClip { clip, .. } => Self::RemoveClip {
                clip_id: clip.id,
                removed: None,
            },
            Self::DeleteClip { removed, .. } | Self::RemoveClip { removed, .. } => {
                let (location, clip) = removed.clone().ok_or_else(not_applied)?;
                Self::RestoreClip { location, clip }
            }
            Self::RestoreClip { clip, .. } => Self::RemoveClip {
                clip_id: clip.id,
                removed: None,
            },
            Self::SplitClip {
                at,
                left_id,
                right_id,
                original,
                ..
            } => Self::JoinClips {
                left_id: *left_id,
                right_id: *right_id,
                at: *at,
                original: original.clone().ok_or_else(not_applied)?,
            },
            Self::JoinClips {
                left_id,
                right_id,
                at,
                original,
            } => Self::SplitClip {
                clip_id: original.id,
                at: *at,
                left_id: *left_id,
                right_id: *right_id,
                original: None,
            },
            Self::DuplicateClip { new_id, .. } => Self::RemoveClip {
                clip_id: *new_id,
                removed: None,
            },
            Self::MoveClip {
                clip_id,
                old_start,
                ..
            } => Self::ResetClipStart {
                clip_id: *clip_id,
                start: old_start.ok_or_else(not_applied)?,
                previous: None,
            },
            Self::ResetClipStart {
                clip_id,
                previous,
                ..
            } => Self::ResetClipStart {
                clip_id: *clip_id,
                start: previous.ok_or_else(not_applied)?,
                previous: None,
            },
            Self::AddTrack { track_id, .. } => Self::RemoveTrack {
                track_id: *track_id,
                removed: None,
            },
            Self::RemoveTrack { removed, .. } => {
                let (index, track) = removed.clone().ok_or_else(not_applied)?;
                Self::RestoreTrack { index, track }
            }
            Self::RestoreTrack { track, .. } => Self::RemoveTrack {
                track_id: track.id,
                removed: None,
            },
            Self::ToggleTrackFlag { track_id, flag } => Self::ToggleTrackFlag {
                track_id: *track_id,
                flag: *flag,
            },
            Self::Batch(commands) => Self::Batch(
                commands
                    .iter()
                    .rev()
                    .map(EditCommand::inverse)
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }

    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertClip { .. } => "insert clip",
            Self::DeleteClip { .. } => "delete clip",
            Self::RemoveClip { .. } => "remove clip",
            Self::RestoreClip { .. } => "restore clip",
            Self::SplitClip { .. } => "split clip",
            Self::JoinClips { .. } => "join clips",
            Self::DuplicateClip { .. } => "duplicate clip",
            Self::MoveClip { .. } => "move clip",
            Self::ResetClipStart { .. } => "reset clip start",
            Self::AddTrack { .. } => "add track",
            Self::RemoveTrack { .. } => "remove track",
            Self::RestoreTrack { .. } => "restore track",
            Self::ToggleTrackFlag { .. } => "toggle track flag",
            Self::Batch(_) => "batch",
        }
    }
}

fn not_applied() -> CutlineError {
    CutlineError::Timeline("command has not been applied".into())
}

// ── Undo stack ──────────────────────────────────────────────────

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoStack {
    /// Commands that have been executed (most recent last).
    undo: Vec<EditCommand>,
    /// Commands that have been undone (most recent last).
    redo: Vec<EditCommand>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Push a command onto the undo stack after it has been executed.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, command: EditCommand) {
        self.redo.clear();
        self.push_redone(command);
    }

    /// Push a re-applied command without touching the redo stack.
    pub fn push_redone(&mut self, command: EditCommand) {
        self.undo.push(command);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Pop the most recent executed command.
    pub fn pop_undo(&mut self) -> Option<EditCommand> {
        self.undo.pop()
    }

    /// Record a command as undone.
    pub fn push_redo(&mut self, command: EditCommand) {
        self.redo.push(command);
    }

    /// Pop the most recently undone command.
    pub fn pop_redo(&mut self) -> Option<EditCommand> {
        self.redo.pop()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(200)
    }
}

// ── Editor ──────────────────────────────────────────────────────

/// A timeline plus its edit history.
#[derive(Debug, Default)]
pub struct Editor {
    timeline: Timeline,
    history: UndoStack,
}

impl Editor {
    pub fn new(timeline: Timeline) -> Self {
        Self::with_history_depth(timeline, UndoStack::default().max_depth())
    }

    pub fn with_history_depth(timeline: Timeline, max_depth: usize) -> Self {
        Self {
            timeline,
            history: UndoStack::new(max_depth),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Direct access for interactive edits such as drags. Changes made here
    /// are not in the history until passed to [`Editor::record`].
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Apply a command and push it onto the history.
    pub fn execute(&mut self, mut command: EditCommand) -> Result<()> {
        command.apply(&mut self.timeline)?;
        debug!("Executed {}", command.label());
        self.history.push(command);
        Ok(())
    }

    /// Push a command whose effect is already on the timeline.
    pub fn record(&mut self, command: EditCommand) {
        debug!("Recorded {}", command.label());
        self.history.push(command);
    }

    /// Undo the most recent command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(command) = self.history.pop_undo() else {
            return Ok(false);
        };
        let result = command
            .inverse()
            .and_then(|mut inverse| inverse.apply(&mut self.timeline));
        match result {
            Ok(()) => {
                info!("Undo {}", command.label());
                self.history.push_redo(command);
                Ok(true)
            }
            Err(e) => {
                self.history.push_redone(command);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone command. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(mut command) = self.history.pop_redo() else {
            return Ok(false);
        };
        match command.apply(&mut self.timeline) {
            Ok(()) => {
                info!("Redo {}", command.label());
                self.history.push_redone(command);
                Ok(true)
            }
            Err(e) => {
                self.history.push_redo(command);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Convenience operations ──────────────────────────────────

    /// Import media into the timeline. Not part of the edit history.
    pub fn import_media(
        &mut self,
        file_name: &str,
        duration: RationalTime,
    ) -> Result<Option<(Uuid, Uuid)>> {
        self.timeline.import_media(file_name, duration)
    }

    pub fn insert_clip(&mut self, track_index: usize, clip: Clip) -> Result<Uuid> {
        let id = clip.id;
        self.execute(EditCommand::InsertClip {
            track_index,
            position: None,
            clip,
        })?;
        Ok(id)
    }

    pub fn split_clip(&mut self, clip_id: Uuid, at: RationalTime) -> Result<(Uuid, Uuid)> {
        let (left_id, right_id) = (Uuid::new_v4(), Uuid::new_v4());
        self.execute(EditCommand::SplitClip {
            clip_id,
            at,
            left_id,
            right_id,
            original: None,
        })?;
        Ok((left_id, right_id))
    }

    pub fn duplicate_clip(&mut self, clip_id: Uuid) -> Result<Uuid> {
        let new_id = Uuid::new_v4();
        self.execute(EditCommand::DuplicateClip { clip_id, new_id })?;
        Ok(new_id)
    }

    pub fn delete_clip(&mut self, clip_id: Uuid) -> Result<()> {
        self.execute(EditCommand::DeleteClip {
            clip_id,
            removed: None,
        })
    }

    /// Move a clip; returns the start actually applied.
    pub fn move_clip(&mut self, clip_id: Uuid, new_start: RationalTime) -> Result<RationalTime> {
        self.execute(EditCommand::MoveClip {
            clip_id,
            new_start,
            old_start: None,
        })?;
        Ok(new_start.max(RationalTime::ZERO))
    }

    pub fn add_track(&mut self, kind: TrackKind) -> Result<Uuid> {
        let track_id = Uuid::new_v4();
        self.execute(EditCommand::AddTrack { kind, track_id })?;
        Ok(track_id)
    }

    pub fn remove_track(&mut self, track_id: Uuid) -> Result<()> {
        self.execute(EditCommand::RemoveTrack {
            track_id,
            removed: None,
        })
    }

    /// Flip a track flag; returns its new value.
    pub fn toggle_track_flag(&mut self, track_id: Uuid, flag: TrackFlag) -> Result<bool> {
        self.execute(EditCommand::ToggleTrackFlag { track_id, flag })?;
        let track = self
            .timeline
            .track(track_id)
            .ok_or_else(|| CutlineError::NotFound(format!("track {track_id}")))?;
        Ok(match flag {
            TrackFlag::Muted => track.muted,
            TrackFlag::Locked => track.locked,
            TrackFlag::Visible => track.visible,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────
