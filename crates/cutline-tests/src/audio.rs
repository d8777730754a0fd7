//! Integration tests for the audio mixer and music library.

use cutline_audio::{library, AudioMixer, EffectParam, MixerTrackKind};
use cutline_core::{CutlineError, RationalTime};
use cutline_timeline::{Clip, Editor, Timeline, TrackKind};

#[test]
fn default_mixer_has_narration_and_music() {
    let mixer = AudioMixer::default();
    let tracks = mixer.tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].kind, MixerTrackKind::Voice);
    assert_eq!(tracks[0].volume, 75.0);
    assert_eq!(tracks[1].kind, MixerTrackKind::Music);
    assert_eq!(tracks[1].volume, 50.0);
    assert_eq!(tracks[1].effects.fade_in, 2.0);
    assert_eq!(mixer.selected(), Some(tracks[0].id));
}

#[test]
fn library_track_lands_on_the_audio_lane() {
    let item = library::find("m3").unwrap();
    let mut mixer = AudioMixer::default();
    let track_id = mixer.add_from_library(item.id).unwrap();
    let track = mixer.track(track_id).unwrap();
    assert_eq!(track.name, "Epic Cinematic");
    assert_eq!(track.effects.fade_out, 2.0);

    let mut editor = Editor::new(Timeline::new("Score"));
    let clip = Clip::new(TrackKind::Audio, item.name, RationalTime::ZERO, item.duration()).unwrap();
    let clip_id = editor.insert_clip(1, clip).unwrap();
    assert_eq!(
        editor.timeline().clip(clip_id).unwrap().end(),
        RationalTime::from_seconds(252)
    );
}

#[test]
fn unknown_library_item_is_not_found() {
    let mut mixer = AudioMixer::empty();
    assert!(matches!(
        mixer.add_from_library("m42"),
        Err(CutlineError::NotFound(_))
    ));
    assert!(mixer.tracks().is_empty());
}

#[test]
fn genre_filter_is_case_insensitive() {
    assert_eq!(library::filter_by_genre(None).len(), 6);
    let pop = library::filter_by_genre(Some("pop"));
    assert_eq!(pop.len(), 1);
    assert_eq!(pop[0].name, "Upbeat Pop");
    assert!(library::filter_by_genre(Some("Jazz")).is_empty());
}

#[test]
fn solo_and_mute_shape_the_mix() {
    let mut mixer = AudioMixer::default();
    let voice = mixer.tracks()[0].id;
    let music = mixer.tracks()[1].id;
    let sfx = mixer.add_track(MixerTrackKind::Sfx);

    mixer.set_master_volume(0.5).unwrap();
    assert_eq!(mixer.effective_gain(voice), 0.375);

    mixer.toggle_solo(music).unwrap();
    assert!(!mixer.is_audible(voice));
    assert!(!mixer.is_audible(sfx));
    assert_eq!(mixer.effective_gain(music), 0.25);

    mixer.toggle_mute(music).unwrap();
    assert_eq!(mixer.effective_gain(music), 0.0);

    mixer.toggle_solo(music).unwrap();
    assert!(mixer.is_audible(voice));
    assert!(mixer.is_audible(sfx));
    assert!(!mixer.is_audible(music));
}

#[test]
fn separation_replaces_the_source_track() {
    let mut mixer = AudioMixer::default();
    let narration = mixer.tracks()[0].id;
    mixer.set_volume(narration, 90.0).unwrap();
    mixer.set_effect(narration, EffectParam::EqLow, -30.0).unwrap();

    let (voice, music) = mixer.separate_voice_music(narration).unwrap();
    assert!(mixer.track(narration).is_none());
    assert_eq!(mixer.tracks().len(), 3);

    let voice = mixer.track(voice).unwrap();
    let music = mixer.track(music).unwrap();
    assert_eq!(voice.name, "Main Narration (Voice)");
    assert_eq!(music.name, "Main Narration (Music)");
    assert_eq!(voice.volume, 90.0);
    assert_eq!(music.effects.eq.low, -12.0);
    // Selection fell back to the first remaining track.
    assert_eq!(mixer.selected(), Some(mixer.tracks()[0].id));
}

#[test]
fn effect_parameters_parse_and_clamp() {
    let mut mixer = AudioMixer::default();
    let id = mixer.tracks()[0].id;
    for param in EffectParam::ALL {
        let parsed: EffectParam = param.to_string().parse().unwrap();
        assert_eq!(parsed, param);
        let (min, max) = param.range();
        assert_eq!(mixer.set_effect(id, param, 1e6).unwrap(), max);
        assert_eq!(mixer.set_effect(id, param, -1e6).unwrap(), min);
    }
    assert!(mixer.set_effect(id, EffectParam::FadeIn, f32::NAN).is_err());
}
