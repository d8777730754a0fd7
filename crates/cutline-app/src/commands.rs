//! Subcommand implementations.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use cutline_core::format_clock;
use cutline_media::{find_preset, ExportSettings, MediaImport};
use cutline_timeline::{Editor, ProjectFile, Timeline, TimelineView};
use tracing::info;

use crate::config::EditorConfig;
use crate::{Command, MarkerAction};

pub fn run(command: Command, config: &EditorConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::New {
            file,
            name,
            media,
            duration,
        } => {
            let name = name.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Untitled".into())
            });
            let mut timeline = Timeline::new(name);
            config.apply_to(&mut timeline);

            if let (Some(media), Some(duration)) = (media, duration) {
                let media = MediaImport::new(&media, None, duration)
                    .with_context(|| format!("cannot import {media}"))?;
                timeline.import_media(&media.file_name, media.duration)?;
            }
            save(&file, timeline.clone())?;
            writeln!(out, "Created {} ({} clips)", file.display(), timeline.clip_count())?;
        }
        Command::Info { file } => {
            let timeline = load(&file, config)?;
            print_info(&timeline, &config.view(), out)?;
        }
        Command::AddTrack { file, kind } => {
            edit(&file, config, out, |editor, out| {
                let id = editor.add_track(kind)?;
                let track = editor.timeline().track(id).context("track vanished")?;
                writeln!(out, "Added track '{}' ({})", track.name, id)?;
                Ok(())
            })?;
        }
        Command::Split { file, clip_id, at } => {
            edit(&file, config, out, |editor, out| {
                let (left, right) = editor.split_clip(clip_id, at)?;
                writeln!(out, "Split into {left} and {right}")?;
                Ok(())
            })?;
        }
        Command::Duplicate { file, clip_id } => {
            edit(&file, config, out, |editor, out| {
                let id = editor.duplicate_clip(clip_id)?;
                writeln!(out, "Duplicated as {id}")?;
                Ok(())
            })?;
        }
        Command::Move {
            file,
            clip_id,
            start,
        } => {
            edit(&file, config, out, |editor, out| {
                let applied = editor.move_clip(clip_id, start)?;
                writeln!(out, "Moved to {applied}")?;
                Ok(())
            })?;
        }
        Command::Delete { file, clip_id } => {
            edit(&file, config, out, |editor, out| {
                editor.delete_clip(clip_id)?;
                writeln!(out, "Deleted {clip_id}")?;
                Ok(())
            })?;
        }
        Command::Marker { file, action, time } => {
            edit(&file, config, out, |editor, out| {
                let timeline = editor.timeline_mut();
                match action {
                    MarkerAction::Add => {
                        timeline.add_marker(time)?;
                        writeln!(out, "Marker at {}", format_clock(time))?;
                    }
                    MarkerAction::Remove => {
                        let removed = timeline.remove_marker(time);
                        writeln!(out, "Removed {removed} marker(s)")?;
                    }
                }
                Ok(())
            })?;
        }
        Command::ExportEstimate { preset, duration } => {
            let mut settings = ExportSettings::default();
            if let Some(key) = preset {
                let Some(preset) = find_preset(&key) else {
                    bail!("unknown export preset {key:?}");
                };
                settings.apply_preset(preset);
            }
            let request = settings.request(duration)?;
            writeln!(
                out,
                "{}: {} {} @ {} fps, {} kbps video + {} kbps audio, ~{:.1} MB",
                request.output_file,
                settings.format,
                settings.resolution,
                settings.fps(),
                settings.bitrate(),
                settings.audio_bitrate(),
                request.estimated_size_mb
            )?;
        }
    }
    Ok(())
}

fn load(path: &Path, config: &EditorConfig) -> Result<Timeline> {
    let file = ProjectFile::load_from_file(path)
        .with_context(|| format!("failed to open project {}", path.display()))?;
    let mut timeline = file.timeline;
    config.apply_to(&mut timeline);
    Ok(timeline)
}

fn save(path: &Path, timeline: Timeline) -> Result<()> {
    ProjectFile::new(timeline)
        .save_to_file(path)
        .with_context(|| format!("failed to save project {}", path.display()))
}

/// Load, run one edit through an editor, save.
fn edit<W: Write>(
    path: &Path,
    config: &EditorConfig,
    out: &mut W,
    op: impl FnOnce(&mut Editor, &mut W) -> Result<()>,
) -> Result<()> {
    let timeline = load(path, config)?;
    let mut editor = Editor::with_history_depth(timeline, config.undo_depth);
    op(&mut editor, out)?;
    info!("Saving {}", path.display());
    save(path, editor.into_timeline())
}

fn print_info(timeline: &Timeline, view: &TimelineView, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{}: duration {}, {} tracks, {} clips",
        timeline.name,
        format_clock(timeline.duration),
        timeline.tracks.len(),
        timeline.clip_count()
    )?;
    writeln!(
        out,
        "ruler: {} ticks, {:.0} px at zoom {}",
        view.tick_count(timeline),
        view.timeline_width(timeline),
        view.zoom()
    )?;
    for (index, track) in timeline.tracks.iter().enumerate() {
        let mut flags = Vec::new();
        if track.muted {
            flags.push("muted");
        }
        if track.locked {
            flags.push("locked");
        }
        if !track.visible {
            flags.push("hidden");
        }
        writeln!(
            out,
            "[{index}] {} ({}){}",
            track.name,
            track.kind,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        )?;
        for clip in &track.clips {
            writeln!(
                out,
                "    {}  {}  {} .. {}{}",
                clip.id,
                clip.name,
                clip.start,
                clip.end(),
                if clip.locked { "  (locked)" } else { "" }
            )?;
        }
    }
    if !timeline.markers.is_empty() {
        let markers: Vec<String> = timeline.markers.iter().copied().map(format_clock).collect();
        writeln!(out, "markers: {}", markers.join(", "))?;
    }
    Ok(())
}
