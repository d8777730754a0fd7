//! Editor preferences loaded from a JSON file.

use std::path::{Path, PathBuf};

use cutline_core::{CutlineError, RationalTime, Result};
use cutline_timeline::{OverlapPolicy, Timeline, TimelineView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// User preferences for editing sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Collision rule applied to every opened timeline
    pub overlap_policy: OverlapPolicy,
    /// Maximum undo steps
    pub undo_depth: usize,
    pub default_zoom: f64,
    /// Seconds between a clip and its duplicate
    pub duplicate_gap_secs: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Allow,
            undo_depth: 200,
            default_zoom: 1.0,
            duplicate_gap_secs: 0.5,
        }
    }
}

impl EditorConfig {
    /// `<config dir>/cutline/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutline").join("config.json"))
    }

    /// Load from `path`, or from the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            debug!("No config directory; using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read(&path)?;
        let config: Self = serde_json::from_slice(&data).map_err(|e| {
            CutlineError::Config(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.undo_depth == 0 {
            return Err(CutlineError::Config("undo_depth must be at least 1".into()));
        }
        if !self.duplicate_gap_secs.is_finite() || self.duplicate_gap_secs < 0.0 {
            return Err(CutlineError::Config(format!(
                "duplicate_gap_secs must be a non-negative number, got {}",
                self.duplicate_gap_secs
            )));
        }
        if !self.default_zoom.is_finite() {
            return Err(CutlineError::Config("default_zoom must be a number".into()));
        }
        Ok(())
    }

    /// Apply the timeline-level preferences.
    pub fn apply_to(&self, timeline: &mut Timeline) {
        timeline.overlap_policy = self.overlap_policy;
        timeline.duplicate_gap = RationalTime::from_seconds_f64(self.duplicate_gap_secs);
    }

    pub fn view(&self) -> TimelineView {
        TimelineView::with_zoom(self.default_zoom)
    }
}
