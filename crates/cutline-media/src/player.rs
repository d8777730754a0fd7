//! Playback transport state.

use cutline_core::{format_clock, CutlineError, RationalTime, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Distance covered by the skip buttons.
pub const SKIP_SECONDS: i64 = 10;
pub const MIN_PLAYBACK_RATE: f64 = 0.25;
pub const MAX_PLAYBACK_RATE: f64 = 2.0;
/// Rates offered by the speed selector.
pub const PLAYBACK_RATES: [f64; 7] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Transport of the preview player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    duration: RationalTime,
    current_time: RationalTime,
    playing: bool,
    /// 0 to 100
    volume: u8,
    muted: bool,
    playback_rate: f64,
    scrubbing: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            duration: RationalTime::ZERO,
            current_time: RationalTime::ZERO,
            playing: false,
            volume: 100,
            muted: false,
            playback_rate: 1.0,
            scrubbing: false,
        }
    }

    /// Load media of the given length, rewinding and pausing.
    pub fn load(&mut self, duration: RationalTime) {
        self.duration = duration.max(RationalTime::ZERO);
        self.current_time = RationalTime::ZERO;
        self.playing = false;
        self.scrubbing = false;
    }

    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    pub fn current_time(&self) -> RationalTime {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    // ── Transport ────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Pause and rewind to the start.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_time = RationalTime::ZERO;
    }

    /// Jump to `time`, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: RationalTime) -> RationalTime {
        self.current_time = time.clamp(RationalTime::ZERO, self.duration);
        debug!("Seek to {}", format_clock(self.current_time));
        self.current_time
    }

    pub fn skip_forward(&mut self) -> RationalTime {
        self.seek(self.current_time + RationalTime::from_seconds(SKIP_SECONDS))
    }

    pub fn skip_backward(&mut self) -> RationalTime {
        self.seek(self.current_time - RationalTime::from_seconds(SKIP_SECONDS))
    }

    /// Begin dragging the seek bar; playback time updates are ignored until it ends.
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
    }

    pub fn end_scrub(&mut self) {
        self.scrubbing = false;
    }

    /// Time reported by the playing media. Ignored while scrubbing; returns whether it was taken.
    pub fn time_update(&mut self, time: RationalTime) -> bool {
        if self.scrubbing {
            return false;
        }
        self.current_time = time.clamp(RationalTime::ZERO, self.duration);
        true
    }

    /// Playback reached the end.
    pub fn ended(&mut self) {
        self.playing = false;
        self.current_time = self.duration;
    }

    // ── Audio ────────────────────────────────────────────────────

    /// Set the volume (clamped to 100). A volume above zero unmutes.
    pub fn set_volume(&mut self, volume: u32) -> u8 {
        self.volume = volume.min(100) as u8;
        if self.volume > 0 && self.muted {
            self.muted = false;
        }
        self.volume
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Output level in 0.0..=1.0 after mute.
    pub fn output_level(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            f64::from(self.volume) / 100.0
        }
    }

    /// Set the playback rate, clamped to 0.25..=2.0.
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<f64> {
        if !rate.is_finite() {
            return Err(CutlineError::InvalidParameter(format!(
                "playback rate must be finite, got {rate}"
            )));
        }
        self.playback_rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        Ok(self.playback_rate)
    }

    /// `current / total` as `m:ss / m:ss`.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.current_time),
            format_clock(self.duration)
        )
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> RationalTime {
        RationalTime::from_seconds(s)
    }

    fn loaded() -> Player {
        let mut player = Player::new();
        player.load(secs(95));
        player
    }

    #[test]
    fn test_stop_rewinds() {
        let mut player = loaded();
        player.play();
        player.seek(secs(30));
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), RationalTime::ZERO);
    }

    #[test]
    fn test_seek_and_skip_clamp() {
        let mut player = loaded();
        assert_eq!(player.seek(secs(200)), secs(95));
        assert_eq!(player.seek(secs(-2)), RationalTime::ZERO);
        assert_eq!(player.skip_backward(), RationalTime::ZERO);
        player.seek(secs(90));
        assert_eq!(player.skip_forward(), secs(95));
        player.seek(secs(40));
        assert_eq!(player.skip_backward(), secs(30));
        assert_eq!(player.time_label(), "0:30 / 1:35");
    }

    #[test]
    fn test_volume_unmutes() {
        let mut player = loaded();
        assert!(player.toggle_mute());
        assert_eq!(player.output_level(), 0.0);
        assert_eq!(player.set_volume(0), 0);
        assert!(player.is_muted());
        assert_eq!(player.set_volume(150), 100);
        assert!(!player.is_muted());
        player.set_volume(40);
        assert_eq!(player.output_level(), 0.4);
    }

    #[test]
    fn test_scrub_suppresses_updates() {
        let mut player = loaded();
        player.begin_scrub();
        player.seek(secs(50));
        assert!(!player.time_update(secs(12)));
        assert_eq!(player.current_time(), secs(50));
        player.end_scrub();
        assert!(player.time_update(secs(51)));
        assert_eq!(player.current_time(), secs(51));
    }

    #[test]
    fn test_playback_rate() {
        let mut player = loaded();
        for rate in PLAYBACK_RATES {
            assert_eq!(player.set_playback_rate(rate).unwrap(), rate);
        }
        assert_eq!(player.set_playback_rate(8.0).unwrap(), 2.0);
        assert_eq!(player.set_playback_rate(0.0).unwrap(), 0.25);
        assert!(player.set_playback_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_ended() {
        let mut player = loaded();
        player.play();
        player.ended();
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), secs(95));
    }
}
