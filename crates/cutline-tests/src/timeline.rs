//! Integration tests for the timeline subsystem.
//!
//! Exercises cutline-media import validation feeding cutline-timeline
//! editing, the view's drag gestures and project persistence.

use cutline_core::{CutlineError, RationalTime};
use cutline_media::MediaImport;
use cutline_timeline::{
    Clip, EditCommand, Editor, OverlapPolicy, ProjectFile, Timeline, TimelineView, TrackFlag,
    TrackKind,
};

fn secs(s: i64) -> RationalTime {
    RationalTime::from_seconds(s)
}

fn imported_editor(file_name: &str, duration: i64) -> (Editor, uuid::Uuid, uuid::Uuid) {
    let media = MediaImport::new(file_name, None, secs(duration)).unwrap();
    let mut editor = Editor::new(Timeline::new("Trip"));
    let (video, audio) = editor
        .import_media(&media.file_name, media.duration)
        .unwrap()
        .expect("empty timeline is seeded");
    (editor, video, audio)
}

#[test]
fn import_seeds_video_and_audio_lanes() {
    let (editor, video, audio) = imported_editor("trip.webm", 42);
    let timeline = editor.timeline();

    assert_eq!(timeline.duration, secs(42));
    let video = timeline.clip(video).unwrap();
    let audio = timeline.clip(audio).unwrap();
    assert_eq!(video.kind, TrackKind::Video);
    assert_eq!(audio.kind, TrackKind::Audio);
    assert_eq!(audio.name, "trip.webm (Audio)");
    assert_eq!((video.start, video.end()), (RationalTime::ZERO, secs(42)));
    assert_eq!(audio.range(), video.range());
    assert!(!editor.can_undo(), "import is not an undoable edit");
}

#[test]
fn rejected_media_never_reaches_the_timeline() {
    let err = MediaImport::new("notes.txt", None, secs(5)).unwrap_err();
    assert!(matches!(err, CutlineError::UnsupportedFormat(_)));

    let err = MediaImport::new("clip.mp4", Some("audio/mpeg"), secs(5)).unwrap_err();
    assert!(matches!(err, CutlineError::UnsupportedFormat(_)));
}

#[test]
fn second_import_keeps_existing_clips() {
    let (mut editor, video, _) = imported_editor("a.mp4", 20);
    let seeded = editor.import_media("b.mp4", secs(60)).unwrap();
    assert!(seeded.is_none());
    assert_eq!(editor.timeline().duration, secs(60));
    assert_eq!(editor.timeline().clip_count(), 2);
    assert!(editor.timeline().clip(video).is_some());
}

#[test]
fn editing_session_undoes_to_the_imported_state() {
    let (mut editor, video, audio) = imported_editor("trip.mp4", 30);
    let imported = editor.timeline().clone();

    let (left, right) = editor.split_clip(video, secs(12)).unwrap();
    let copy = editor.duplicate_clip(right).unwrap();
    editor.move_clip(audio, secs(3)).unwrap();
    let text = Clip::new(TrackKind::Text, "Title", secs(1), secs(4)).unwrap();
    let title = editor.insert_clip(2, text).unwrap();
    editor.delete_clip(left).unwrap();

    let timeline = editor.timeline();
    assert_eq!(timeline.clip(copy).unwrap().start, secs(30) + RationalTime::new(1, 2));
    assert_eq!(timeline.clip(audio).unwrap().start, secs(3));
    assert_eq!(timeline.clip(title).unwrap().track_index, 2);
    assert!(timeline.clip(left).is_none());

    while editor.undo().unwrap() {}
    assert_eq!(editor.timeline(), &imported);

    while editor.redo().unwrap() {}
    let timeline = editor.timeline();
    assert!(timeline.clip(left).is_none());
    assert!(timeline.clip(right).is_some());
    assert!(timeline.clip(copy).is_some());
    assert_eq!(timeline.clip(title).unwrap().name, "Title");
}

#[test]
fn locked_track_blocks_edits_until_unlocked() {
    let (mut editor, video, _) = imported_editor("trip.mp4", 30);
    let video_track = editor.timeline().tracks[0].id;

    assert!(editor.toggle_track_flag(video_track, TrackFlag::Locked).unwrap());
    assert!(matches!(
        editor.split_clip(video, secs(5)),
        Err(CutlineError::Locked(_))
    ));
    assert!(matches!(
        editor.delete_clip(video),
        Err(CutlineError::Locked(_))
    ));

    let mut view = TimelineView::new();
    assert!(matches!(
        view.begin_drag(&editor, video),
        Err(CutlineError::Locked(_))
    ));

    editor.undo().unwrap();
    assert!(!editor.timeline().tracks[0].locked);
    editor.split_clip(video, secs(5)).unwrap();
}

#[test]
fn drag_records_one_undoable_move() {
    let (mut editor, _, audio) = imported_editor("trip.mp4", 30);
    let mut view = TimelineView::with_zoom(2.0);

    view.begin_drag(&editor, audio).unwrap();
    for x in [50.0, 200.0, 400.0] {
        view.drag_to_pixel(&mut editor, x).unwrap();
    }
    assert!(view.end_drag(&mut editor));
    // 400 px at 100 px/s
    assert_eq!(editor.timeline().clip(audio).unwrap().start, secs(4));
    assert_eq!(editor.history().undo_count(), 1);

    editor.undo().unwrap();
    assert_eq!(editor.timeline().clip(audio).unwrap().start, RationalTime::ZERO);
}

#[test]
fn reject_policy_guards_every_entry_point() {
    let mut editor = Editor::new(Timeline::new("Strict").with_overlap_policy(OverlapPolicy::Reject));
    editor.import_media("trip.mp4", secs(10)).unwrap();

    let overlapping = Clip::new(TrackKind::Video, "B-roll", secs(8), secs(4)).unwrap();
    assert!(matches!(
        editor.insert_clip(0, overlapping),
        Err(CutlineError::Overlap(_))
    ));

    let later = Clip::new(TrackKind::Video, "B-roll", secs(12), secs(4)).unwrap();
    let broll = editor.insert_clip(0, later).unwrap();
    assert!(matches!(
        editor.move_clip(broll, secs(9)),
        Err(CutlineError::Overlap(_))
    ));
    assert_eq!(editor.timeline().clip(broll).unwrap().start, secs(12));
}

#[test]
fn failed_batch_leaves_timeline_untouched() {
    let (mut editor, video, audio) = imported_editor("trip.mp4", 30);
    let before = editor.timeline().clone();

    let batch = EditCommand::Batch(vec![
        EditCommand::MoveClip {
            clip_id: audio,
            new_start: secs(2),
            old_start: None,
        },
        EditCommand::SplitClip {
            clip_id: video,
            at: secs(45),
            left_id: uuid::Uuid::new_v4(),
            right_id: uuid::Uuid::new_v4(),
            original: None,
        },
    ]);
    assert!(editor.execute(batch).is_err());
    assert_eq!(editor.timeline(), &before);
    assert!(!editor.can_undo());
}

#[test]
fn project_round_trips_through_json() {
    let (mut editor, video, _) = imported_editor("trip.mp4", 30);
    editor.split_clip(video, secs(10)).unwrap();
    editor.add_track(TrackKind::Effect).unwrap();
    editor.timeline_mut().add_marker(secs(7)).unwrap();

    let file = ProjectFile::new(editor.timeline().clone());
    let json = file.to_json().unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap();
    assert_eq!(loaded, file);

    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["timeline"]["tracks"].as_array().unwrap().len(), 4);
}

#[test]
fn view_geometry_follows_the_timeline() {
    let (editor, _, _) = imported_editor("trip.mp4", 30);
    let mut view = TimelineView::new();

    assert_eq!(view.timeline_width(editor.timeline()), 1500.0);
    assert_eq!(view.ruler_ticks(editor.timeline()).len(), 31);
    view.zoom_in();
    assert_eq!(view.timeline_width(editor.timeline()), 2250.0);
    assert_eq!(view.time_at_pixel(editor.timeline(), 1e9), secs(30));
}
