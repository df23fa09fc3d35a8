/// Parsed descriptor data structures

/// Data track selection and extent calculation
pub mod extent;
/// Session structure
pub mod session;
/// Track table entries
pub mod track;

pub use extent::{find_data_track, TrackExtent};
pub use session::Session;
pub use track::{AdrControl, Filename, Msf, Point, Track, TrackData};

use crate::error::{MdsError, Result};
use crate::format::{media_type_name, DescriptorHeader};
use std::path::{Path, PathBuf};

/// A parsed MDS descriptor
///
/// Holds only owned data; the mapped descriptor file is released once
/// parsing finishes.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Decoded header
    pub(crate) header: DescriptorHeader,
    /// Sessions in file order
    pub(crate) sessions: Vec<Session>,
    /// Path the descriptor was read from
    pub(crate) path: PathBuf,
}

impl Descriptor {
    /// Open and parse a descriptor file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::reader::read_mds(path)
    }

    /// Get the decoded header
    pub fn header(&self) -> &DescriptorHeader {
        &self.header
    }

    /// Format version as (major, minor)
    pub fn version(&self) -> (u8, u8) {
        (self.header.major(), self.header.minor())
    }

    /// Media type display name
    pub fn media_type(&self) -> &'static str {
        media_type_name(self.header.media_type)
    }

    /// Path the descriptor was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get all sessions
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// All track table entries across sessions
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.sessions.iter().flat_map(|s| s.tracks().iter())
    }

    /// Extent of the first data track, scanning sessions in order
    pub fn data_track_extent(&self) -> Result<TrackExtent> {
        for session in &self.sessions {
            if let Some(index) = find_data_track(session) {
                return TrackExtent::for_track(session, index);
            }
        }
        Err(MdsError::NoDataTrack)
    }

    /// Extent of a specific data track
    pub fn track_extent(&self, number: u8) -> Result<TrackExtent> {
        for session in &self.sessions {
            let found = session
                .tracks()
                .iter()
                .position(|t| t.point == Point::Track(number));
            if let Some(index) = found {
                if !session.tracks()[index].is_data() {
                    return Err(MdsError::TrackNotFound(number));
                }
                return TrackExtent::for_track(session, index);
            }
        }
        Err(MdsError::TrackNotFound(number))
    }
}
