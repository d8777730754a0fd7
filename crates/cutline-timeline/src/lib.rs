//! Cutline Timeline - Timeline data model
//!
//! Implements the timeline structure of the editor:
//! - Tracks of clips with lock/mute/visibility flags
//! - Split, duplicate, move and delete with an overlap policy
//! - Edit operations with undo/redo
//! - Ruler geometry, selection and drags
//! - Versioned project files

pub mod clip;
pub mod edit;
pub mod serialization;
pub mod timeline;
pub mod track;
pub mod view;

pub use clip::Clip;
pub use edit::{EditCommand, Editor, UndoStack};
pub use serialization::ProjectFile;
pub use timeline::{ClipLocation, OverlapPolicy, Timeline, TrackFlag};
pub use track::{Track, TrackKind};
pub use view::{RulerTick, TimelineView};
