//! Benchmarks for timeline edits.
//!
//! Run with: cargo bench -p cutline-timeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cutline_core::RationalTime;
use cutline_timeline::{Clip, Editor, Timeline, TrackKind};

fn populated_timeline(clips: i64) -> Timeline {
    let mut timeline = Timeline::new("bench");
    for i in 0..clips {
        let clip = Clip::new(
            TrackKind::Video,
            format!("clip {i}"),
            RationalTime::from_seconds(i * 5),
            RationalTime::from_seconds(4),
        )
        .unwrap();
        timeline.insert_clip(0, None, clip).unwrap();
    }
    timeline
}

fn bench_split(c: &mut Criterion) {
    let timeline = populated_timeline(500);
    let target = timeline.tracks[0].clips[250].id;

    c.bench_function("split_clip_500", |bencher| {
        bencher.iter_batched(
            || timeline.clone(),
            |mut t| t.split_clip(black_box(target), RationalTime::new(2503, 2)),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_clips_at(c: &mut Criterion) {
    let timeline = populated_timeline(500);

    c.bench_function("clips_at_500", |bencher| {
        bencher.iter(|| timeline.clips_at(black_box(RationalTime::from_seconds(1201))));
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let timeline = populated_timeline(100);
    let target = timeline.tracks[0].clips[50].id;

    c.bench_function("move_undo_redo_100", |bencher| {
        bencher.iter_batched(
            || Editor::new(timeline.clone()),
            |mut editor| {
                editor.move_clip(target, RationalTime::from_seconds(1000)).unwrap();
                editor.undo().unwrap();
                editor.redo().unwrap();
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_split, bench_clips_at, bench_undo_redo);
criterion_main!(benches);
