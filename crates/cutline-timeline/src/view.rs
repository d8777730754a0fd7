//! Zoomable ruler geometry, clip selection and mouse drags.

use cutline_core::{format_clock, CutlineError, RationalTime, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::edit::{EditCommand, Editor};
use crate::timeline::Timeline;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
pub const ZOOM_STEP: f64 = 0.5;
/// Pixels per second at zoom 1.0.
pub const BASE_PIXELS_PER_SECOND: f64 = 50.0;

/// One labelled tick on the ruler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerTick {
    pub second: i64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    clip_id: Uuid,
    origin: RationalTime,
}

/// Per-view state of the timeline panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    zoom: f64,
    selected: Option<Uuid>,
    drag: Option<DragSession>,
}

impl TimelineView {
    pub fn new() -> Self {
        Self::with_zoom(1.0)
    }

    pub fn with_zoom(zoom: f64) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            selected: None,
            drag: None,
        }
    }

    // ── Zoom ─────────────────────────────────────────────────────

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + ZOOM_STEP);
        self.zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - ZOOM_STEP);
        self.zoom
    }

    pub fn pixels_per_second(&self) -> f64 {
        BASE_PIXELS_PER_SECOND * self.zoom
    }

    /// Width in pixels of the whole timeline at the current zoom.
    pub fn timeline_width(&self, timeline: &Timeline) -> f64 {
        timeline.duration.to_seconds_f64() * self.pixels_per_second()
    }

    pub fn pixel_at_time(&self, time: RationalTime) -> f64 {
        time.to_seconds_f64() * self.pixels_per_second()
    }

    /// Time under a ruler pixel, clamped to `[0, duration]`.
    pub fn time_at_pixel(&self, timeline: &Timeline, x: f64) -> RationalTime {
        let time = RationalTime::from_seconds_f64(x / self.pixels_per_second());
        time.clamp(RationalTime::ZERO, timeline.duration.max(RationalTime::ZERO))
    }

    /// Number of ruler ticks, without building them.
    pub fn tick_count(&self, timeline: &Timeline) -> u64 {
        timeline.duration.ceil_seconds().max(0).unsigned_abs() + 1
    }

    /// A tick for every whole second up to and including `ceil(duration)`.
    /// Allocates one entry per tick; see [`TimelineView::tick_count`].
    pub fn ruler_ticks(&self, timeline: &Timeline) -> Vec<RulerTick> {
        let last = timeline.duration.ceil_seconds().max(0);
        (0..=last)
            .map(|second| {
                let time = RationalTime::from_seconds(second);
                RulerTick {
                    second,
                    x: self.pixel_at_time(time),
                    label: format_clock(time),
                }
            })
            .collect()
    }

    // ── Selection ────────────────────────────────────────────────

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Select a clip. Locked clips are ignored; returns whether the selection changed.
    pub fn select(&mut self, timeline: &Timeline, clip_id: Uuid) -> bool {
        match timeline.clip(clip_id) {
            Some(clip) if !clip.locked => {
                self.selected = Some(clip_id);
                true
            }
            _ => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Delete the selected clip through the editor and clear the selection.
    pub fn delete_selected(&mut self, editor: &mut Editor) -> Result<Option<Uuid>> {
        let Some(clip_id) = self.selected else {
            return Ok(None);
        };
        editor.delete_clip(clip_id)?;
        self.selected = None;
        Ok(Some(clip_id))
    }

    // ── Dragging ─────────────────────────────────────────────────

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start dragging a clip. Locked clips and clips on locked tracks cannot be dragged.
    pub fn begin_drag(&mut self, editor: &Editor, clip_id: Uuid) -> Result<()> {
        let timeline = editor.timeline();
        let loc = timeline
            .locate(clip_id)
            .ok_or_else(|| CutlineError::NotFound(format!("clip {clip_id}")))?;
        let track = &timeline.tracks[loc.track_index];
        let clip = &track.clips[loc.position];
        if clip.locked || track.locked {
            warn!("Refusing to drag locked clip '{}'", clip.name);
            return Err(CutlineError::Locked(format!("clip '{}'", clip.name)));
        }
        self.drag = Some(DragSession {
            clip_id,
            origin: clip.start,
        });
        Ok(())
    }

    /// Move the dragged clip so it starts under pixel `x`; returns the applied start.
    pub fn drag_to_pixel(&mut self, editor: &mut Editor, x: f64) -> Result<RationalTime> {
        let session = self
            .drag
            .ok_or_else(|| CutlineError::Timeline("no drag in progress".into()))?;
        let proposed = RationalTime::from_seconds_f64(x / self.pixels_per_second());
        editor.timeline_mut().move_clip(session.clip_id, proposed)
    }

    /// Finish the drag, recording one move in the history if the clip moved.
    pub fn end_drag(&mut self, editor: &mut Editor) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        let Some(start) = editor.timeline().clip(session.clip_id).map(|c| c.start) else {
            return false;
        };
        if start == session.origin {
            return false;
        }
        debug!("Drag finished at {}", start);
        editor.record(EditCommand::MoveClip {
            clip_id: session.clip_id,
            new_start: start,
            old_start: Some(session.origin),
        });
        true
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}
