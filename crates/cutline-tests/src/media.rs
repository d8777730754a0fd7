//! Integration tests for the preview player, effects panel and export panel.
//!
//! The timeline's duration drives both the player and the export estimate.

use cutline_core::RationalTime;
use cutline_effects::{
    Adjustment, EffectsPanel, LookPreset, SubtitlePosition, SubtitleRequest, SubtitleStyle,
};
use cutline_media::{
    find_preset, ContainerFormat, ExportSettings, Player, Quality, Resolution, PRESETS,
};
use cutline_timeline::Timeline;

fn secs(s: i64) -> RationalTime {
    RationalTime::from_seconds(s)
}

fn imported(duration: i64) -> Timeline {
    let mut timeline = Timeline::new("Trip");
    timeline.import_media("trip.mp4", secs(duration)).unwrap();
    timeline
}

#[test]
fn player_follows_the_imported_media() {
    let timeline = imported(125);
    let mut player = Player::new();
    player.load(timeline.duration);

    assert_eq!(player.time_label(), "0:00 / 2:05");
    player.play();
    assert!(player.time_update(secs(61)));
    assert_eq!(player.time_label(), "1:01 / 2:05");
    player.seek(secs(500));
    assert_eq!(player.current_time(), secs(125));

    player.load(secs(10));
    assert!(!player.is_playing());
    assert_eq!(player.current_time(), RationalTime::ZERO);
}

#[test]
fn export_request_for_a_timeline() {
    let timeline = imported(60);
    let settings = ExportSettings::default();
    let request = settings.request(timeline.duration).unwrap();

    assert_eq!(request.output_file, "mi-video-editado.mp4");
    assert_eq!(request.duration, secs(60));
    // (8000 + 320) kbps for a minute
    assert!((request.estimated_size_mb - 60.9375).abs() < 1e-9);
}

#[test]
fn empty_timeline_cannot_be_exported() {
    let timeline = Timeline::new("Nothing");
    assert!(ExportSettings::default().request(timeline.duration).is_err());
}

#[test]
fn presets_drive_export_settings() {
    assert_eq!(PRESETS.len(), 6);

    let mut settings = ExportSettings::default();
    settings.apply_preset(find_preset("YouTube").unwrap());
    assert_eq!(settings.resolution, Resolution::FULL_HD);
    assert_eq!((settings.bitrate(), settings.fps()), (10_000, 30));

    settings.apply_preset(find_preset("instagram-story").unwrap());
    assert_eq!(settings.resolution, Resolution::VERTICAL);
    assert_eq!(settings.quality, Quality::Medium);
    assert_eq!(settings.bitrate(), 5_000);

    settings.format = ContainerFormat::Webm;
    settings.file_name = "story".into();
    assert_eq!(settings.output_file_name(), "story.webm");
}

#[test]
fn export_sliders_snap_to_their_steps() {
    let mut settings = ExportSettings::default();
    assert_eq!(settings.set_fps(1), 24);
    assert_eq!(settings.set_fps(500), 120);
    assert_eq!(settings.set_bitrate(12_400), 12_000);
    assert_eq!(settings.set_audio_bitrate(200), 192);
}

#[test]
fn look_then_manual_tweak() {
    let mut panel = EffectsPanel::new();
    assert!(panel.apply().adjustments.is_identity());

    panel.apply_preset(LookPreset::BlackAndWhite);
    let request = panel.apply();
    assert_eq!(request.preset, Some(LookPreset::BlackAndWhite));
    assert_eq!(request.adjustments.saturation, 0.0);

    assert_eq!(panel.set(Adjustment::Blur, 99.0).unwrap(), 20.0);
    let request = panel.apply();
    assert_eq!(request.preset, None);
    assert_eq!(request.adjustments.contrast, 120.0);

    panel.reset();
    assert_eq!(panel, EffectsPanel::default());
}

#[test]
fn look_names_parse() {
    for look in LookPreset::ALL {
        let parsed: LookPreset = look.to_string().parse().unwrap();
        assert_eq!(parsed, look);
    }
    assert!("sepia".parse::<LookPreset>().is_err());
}

#[test]
fn subtitle_requests_validate_text_and_size() {
    let request =
        SubtitleRequest::new(" Day one ", SubtitleStyle::Boxed, SubtitlePosition::Center, 72)
            .unwrap();
    assert_eq!(request.text, "Day one");

    assert!(SubtitleRequest::new("   ", SubtitleStyle::default(), SubtitlePosition::default(), 24)
        .is_err());
    assert!(SubtitleRequest::new("Hi", SubtitleStyle::Bold, SubtitlePosition::Top, 11).is_err());
}
