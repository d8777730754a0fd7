//! Integration test crate for Cutline.
//!
//! Holds cross-crate tests only; each crate keeps its unit tests inline.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod audio;

#[cfg(test)]
mod media;

#[cfg(test)]
mod properties;
