//! Cutline Core - Foundation types for the editing model
//!
//! This crate provides the fundamental types shared by every Cutline crate:
//! - Time representation (RationalTime, TimeRange)
//! - Display colors carried on clips
//! - The shared error type

pub mod color;
pub mod error;
pub mod time;

pub use color::Color;
pub use error::{CutlineError, Result};
pub use time::{format_clock, RationalTime, TimeRange};
