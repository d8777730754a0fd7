//! Project serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use std::path::Path;

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::timeline::Timeline;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The edited timeline; its name is the project name.
    pub timeline: Timeline,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            version: CURRENT_VERSION,
            timeline,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("Failed to serialize project: {e}")))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CutlineError::Serialization(format!("Invalid JSON: {e}")))?;

        let version = match raw.get("version") {
            None => 0,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    CutlineError::Serialization(format!("Invalid project version: {v}"))
                })?,
        };

        if version > CURRENT_VERSION {
            return Err(CutlineError::Serialization(format!(
                "Project file version {version} is newer than supported version {CURRENT_VERSION}"
            )));
        }

        let migrated = migrate(raw, version)?;
        let file: Self = serde_json::from_value(migrated)
            .map_err(|e| CutlineError::Serialization(format!("Failed to parse project: {e}")))?;
        file.timeline
            .validate()
            .map_err(|e| CutlineError::Serialization(format!("Invalid project: {e}")))?;
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        info!("Saved project '{}' to {}", self.timeline.name, path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let file = Self::from_json(&data)?;
        info!("Loaded project '{}' from {}", file.timeline.name, path.display());
        Ok(file)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 files are a bare timeline
                data = serde_json::json!({
                    "version": 1,
                    "timeline": data,
                    "app_version": "0.0.0",
                });
                version = 1;
            }
            _ => {
                return Err(CutlineError::Serialization(format!(
                    "No migration path from version {version}"
                )));
            }
        }
    }

    Ok(data)
}
