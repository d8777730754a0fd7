//! Bundled royalty-free music catalogue.

use cutline_core::RationalTime;
use serde::Serialize;

/// One entry of the music library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryItem {
    pub id: &'static str,
    pub name: &'static str,
    pub artist: &'static str,
    /// Length in whole seconds
    pub duration_secs: i64,
    pub genre: &'static str,
    pub mood: &'static str,
}

impl LibraryItem {
    pub fn duration(&self) -> RationalTime {
        RationalTime::from_seconds(self.duration_secs)
    }
}

pub const MUSIC_LIBRARY: [LibraryItem; 6] = [
    LibraryItem {
        id: "m1",
        name: "Ambient Dreams",
        artist: "AudioLibrary",
        duration_secs: 204,
        genre: "Ambient",
        mood: "Calm",
    },
    LibraryItem {
        id: "m2",
        name: "Corporate Motivational",
        artist: "FreeMusic",
        duration_secs: 165,
        genre: "Corporate",
        mood: "Uplifting",
    },
    LibraryItem {
        id: "m3",
        name: "Epic Cinematic",
        artist: "SoundCloud",
        duration_secs: 252,
        genre: "Cinematic",
        mood: "Dramatic",
    },
    LibraryItem {
        id: "m4",
        name: "Upbeat Pop",
        artist: "Bensound",
        duration_secs: 178,
        genre: "Pop",
        mood: "Happy",
    },
    LibraryItem {
        id: "m5",
        name: "Acoustic Guitar",
        artist: "AudioJungle",
        duration_secs: 215,
        genre: "Acoustic",
        mood: "Peaceful",
    },
    LibraryItem {
        id: "m6",
        name: "Electronic Beat",
        artist: "FMA",
        duration_secs: 195,
        genre: "Electronic",
        mood: "Energetic",
    },
];

/// Look up a library entry by id.
pub fn find(id: &str) -> Option<&'static LibraryItem> {
    MUSIC_LIBRARY.iter().find(|item| item.id == id)
}

/// Entries whose genre matches `genre` (case-insensitive), or all entries.
pub fn filter_by_genre(genre: Option<&str>) -> Vec<&'static LibraryItem> {
    MUSIC_LIBRARY
        .iter()
        .filter(|item| genre.map_or(true, |g| item.genre.eq_ignore_ascii_case(g.trim())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("m3").unwrap().name, "Epic Cinematic");
        assert!(find("m7").is_none());
        assert_eq!(find("m1").unwrap().duration(), RationalTime::from_seconds(204));
    }

    #[test]
    fn test_genre_filter() {
        assert_eq!(filter_by_genre(None).len(), 6);
        let pop = filter_by_genre(Some("pop"));
        assert_eq!(pop.len(), 1);
        assert_eq!(pop[0].id, "m4");
        assert!(filter_by_genre(Some("Jazz")).is_empty());
    }
}
