/// Session data structures

use crate::image::track::Track;

/// A disc session and its track table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session number, starting at 1
    pub number: u16,
    /// First sector (negative when the pregap is included)
    pub sec_first: i32,
    /// Sector where the session ends
    pub sec_last: i32,
    /// First track number
    pub first_track: u16,
    /// Last track number
    pub last_track: u16,
    /// Byte offset of the session record in the descriptor
    pub record_offset: usize,
    /// Track table entries, pseudo entries included
    tracks: Vec<Track>,
}

impl Session {
    /// Create a session with preallocated track table
    pub fn with_capacity(
        number: u16,
        sec_first: i32,
        sec_last: i32,
        first_track: u16,
        last_track: u16,
        record_offset: usize,
        num_entries: usize,
    ) -> Self {
        Self {
            number,
            sec_first,
            sec_last,
            first_track,
            last_track,
            record_offset,
            tracks: Vec::with_capacity(num_entries),
        }
    }

    /// Add a track table entry
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Get all entries in table order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of table entries
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Find a real track by its point number
    pub fn get_track(&self, number: u8) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.point == crate::image::Point::Track(number))
    }

    /// Real tracks only, pseudo entries skipped
    pub fn real_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.point.is_track())
    }
}
