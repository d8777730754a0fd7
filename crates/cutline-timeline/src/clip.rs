//! Clip types for the timeline.

use cutline_core::{Color, CutlineError, RationalTime, Result, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::track::TrackKind;

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Kind of content (matches the owning track)
    pub kind: TrackKind,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Offset from the start of the timeline
    pub start: RationalTime,
    /// Duration on timeline
    pub duration: RationalTime,
    /// Index of the owning track, maintained by the timeline
    pub track_index: usize,
    /// Display color
    pub color: Color,
    /// Is clip locked (prevent edits)
    pub locked: bool,
    /// Is clip visible
    pub visible: bool,
}

impl Clip {
    /// Create a new clip. `start` must not be negative and `duration` must be positive.
    pub fn new(
        kind: TrackKind,
        name: impl Into<String>,
        start: RationalTime,
        duration: RationalTime,
    ) -> Result<Self> {
        validate_placement(start, duration)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            start,
            duration,
            track_index: 0,
            color: kind.default_color(),
            locked: false,
            visible: true,
        })
    }

    /// End time (exclusive).
    pub fn end(&self) -> RationalTime {
        self.start + self.duration
    }

    /// Get the timeline range covered by this clip.
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.duration)
    }

    /// Split at an absolute timeline time, assigning fresh ids to both parts.
    pub fn split_at(&self, at: RationalTime) -> Result<(Clip, Clip)> {
        self.split_at_with_ids(at, Uuid::new_v4(), Uuid::new_v4())
    }

    /// Split at an absolute timeline time using the given ids.
    ///
    /// `at` must lie strictly inside `(start, end)`. The left part keeps the
    /// start, the right part starts at `at`; every other field is preserved.
    pub fn split_at_with_ids(
        &self,
        at: RationalTime,
        left_id: Uuid,
        right_id: Uuid,
    ) -> Result<(Clip, Clip)> {
        if !self.range().contains_strictly(at) {
            return Err(CutlineError::InvalidParameter(format!(
                "split point {} is outside clip '{}' ({} .. {})",
                at,
                self.name,
                self.start,
                self.end()
            )));
        }

        let unrepresentable =
            || CutlineError::InvalidParameter(format!("split point {at} is not representable"));
        let left_duration = at.checked_sub(self.start).ok_or_else(unrepresentable)?;
        let right_duration = self.end().checked_sub(at).ok_or_else(unrepresentable)?;
        validate_placement(self.start, left_duration)?;
        validate_placement(at, right_duration)?;

        let left = Clip {
            id: left_id,
            duration: left_duration,
            ..self.clone()
        };
        let right = Clip {
            id: right_id,
            start: at,
            duration: right_duration,
            ..self.clone()
        };
        Ok((left, right))
    }

    /// Copy of this clip placed at `start` with a new id.
    pub fn duplicate_at(&self, start: RationalTime, id: Uuid) -> Clip {
        Clip {
            id,
            start,
            ..self.clone()
        }
    }

    /// Move the clip, clamping the start to zero. Returns the applied start.
    pub fn move_to(&mut self, proposed_start: RationalTime) -> RationalTime {
        self.start = proposed_start.max(RationalTime::ZERO);
        self.start
    }
}

/// Check the start/duration invariants of a clip: the start is not negative,
/// the duration is positive and the end is exact and no later than
/// `RationalTime::MAX`.
pub(crate) fn validate_placement(start: RationalTime, duration: RationalTime) -> Result<()> {
    if start.is_negative() {
        return Err(CutlineError::InvalidParameter(format!(
            "clip start must not be negative, got {start}"
        )));
    }
    if !duration.is_positive() {
        return Err(CutlineError::InvalidParameter(format!(
            "clip duration must be positive, got {duration}"
        )));
    }
    match start.checked_add(duration) {
        Some(end) if end <= RationalTime::MAX => Ok(()),
        _ => Err(CutlineError::InvalidParameter(format!(
            "clip end out of range: {start} + {duration}"
        ))),
    }
}
