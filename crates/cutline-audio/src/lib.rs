//! Cutline Audio - Audio mixer state
//!
//! Handles the mixer panel's bookkeeping:
//! - `AudioMixer`: tracks with volume, mute/solo, EQ and effects
//! - `library`: the bundled music catalogue

pub mod library;
pub mod mixer;

pub use library::{LibraryItem, MUSIC_LIBRARY};
pub use mixer::{
    AudioMixer, EffectParam, Equalizer, MixerTrack, MixerTrackKind, TrackEffects,
};
