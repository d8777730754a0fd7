//! Property-based tests for timeline, view and mixer invariants.

use cutline_audio::{AudioMixer, EffectParam};
use cutline_core::RationalTime;
use cutline_timeline::{
    Clip, Editor, OverlapPolicy, Timeline, TimelineView, TrackKind,
};
use proptest::prelude::*;

fn secs(s: i64) -> RationalTime {
    RationalTime::from_seconds(s)
}

proptest! {
    /// Both halves of a split add up to the original clip.
    #[test]
    fn split_halves_cover_the_original(start in 0i64..100, len in 2i64..200, offset in 1i64..199) {
        prop_assume!(offset < len);
        let mut editor = Editor::new(Timeline::new("P"));
        let mut clip = Clip::new(TrackKind::Video, "c", secs(start), secs(len)).unwrap();
        clip.visible = false;
        let id = editor.insert_clip(0, clip).unwrap();
        let original = editor.timeline().clip(id).unwrap().clone();

        let (left, right) = editor.split_clip(id, secs(start + offset)).unwrap();
        let timeline = editor.timeline();
        let left = timeline.clip(left).unwrap();
        let right = timeline.clip(right).unwrap();
        prop_assert_eq!(left.start, secs(start));
        prop_assert_eq!(left.end(), right.start);
        prop_assert_eq!(left.duration + right.duration, secs(len));

        for part in [left, right] {
            let whole = Clip {
                id: original.id,
                start: original.start,
                duration: original.duration,
                ..part.clone()
            };
            prop_assert_eq!(&whole, &original);
        }
    }

    /// Under the reject policy no two clips on a track ever intersect.
    #[test]
    fn reject_policy_never_overlaps(
        placements in prop::collection::vec((0i64..60, 1i64..20), 1..20),
        moves in prop::collection::vec((0usize..20, -10i64..80), 0..20),
    ) {
        let mut editor =
            Editor::new(Timeline::new("P").with_overlap_policy(OverlapPolicy::Reject));
        let mut ids = Vec::new();
        for (start, len) in placements {
            let clip = Clip::new(TrackKind::Video, "c", secs(start), secs(len)).unwrap();
            if let Ok(id) = editor.insert_clip(0, clip) {
                ids.push(id);
            }
        }
        for (pick, start) in moves {
            if let Some(&id) = ids.get(pick % ids.len().max(1)) {
                let _ = editor.move_clip(id, secs(start));
            }
        }

        let clips = &editor.timeline().tracks[0].clips;
        for (i, a) in clips.iter().enumerate() {
            for b in &clips[i + 1..] {
                prop_assert!(!a.range().overlaps(b.range()));
            }
        }
    }

    /// Undoing every move restores the original timeline.
    #[test]
    fn undo_restores_after_moves(targets in prop::collection::vec(-20i64..100, 1..15)) {
        let mut editor = Editor::new(Timeline::new("P"));
        editor.import_media("p.mp4", secs(30)).unwrap();
        let original = editor.timeline().clone();
        let clip = original.tracks[0].clips[0].id;

        for target in &targets {
            editor.move_clip(clip, secs(*target)).unwrap();
        }
        prop_assert!(editor.timeline().clip(clip).unwrap().start >= RationalTime::ZERO);
        while editor.undo().unwrap() {}
        prop_assert_eq!(editor.timeline(), &original);
    }

    /// Zoom stays within bounds however it is driven.
    #[test]
    fn zoom_stays_in_bounds(zoom in -100.0f64..100.0, steps in prop::collection::vec(any::<bool>(), 0..30)) {
        let mut view = TimelineView::with_zoom(zoom);
        for step in steps {
            if step { view.zoom_in(); } else { view.zoom_out(); }
            prop_assert!((0.5..=5.0).contains(&view.zoom()));
        }
        prop_assert!((0.5..=5.0).contains(&view.zoom()));
    }

    /// Mixer values are always stored within their ranges.
    #[test]
    fn mixer_values_are_clamped(volume in -1e4f32..1e4, value in -1e4f32..1e4, param in 0usize..6) {
        let mut mixer = AudioMixer::default();
        let id = mixer.tracks()[0].id;
        let stored = mixer.set_volume(id, volume).unwrap();
        prop_assert!((0.0..=100.0).contains(&stored));

        let param = EffectParam::ALL[param];
        let (min, max) = param.range();
        let stored = mixer.set_effect(id, param, value).unwrap();
        prop_assert!(stored >= min && stored <= max);
        prop_assert_eq!(param.get(&mixer.track(id).unwrap().effects), stored);
    }
}
