/// Track table entries

use crate::format::constants::*;
use crate::format::{IndexBlock, TrackMode};

/// Classifier of a track table entry
///
/// Only [`Point::Track`] describes sectors on the disc; every other variant
/// carries table-of-contents metadata in the point position fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Point {
    /// Real track, numbered 0x01 to 0x99
    Track(u8),
    /// 0xA0: first track number and disc type
    FirstTrack,
    /// 0xA1: last track number
    LastTrack,
    /// 0xA2: lead-out start position
    LeadOut,
    /// 0xB0 or 0xC0: session boundary marker
    SessionBoundary(u8),
    /// Any other value
    Other(u8),
}

impl From<u8> for Point {
    fn from(value: u8) -> Self {
        match value {
            0x01..=POINT_LAST_TRACK => Point::Track(value),
            POINT_FIRST_TRACK_INFO => Point::FirstTrack,
            POINT_LAST_TRACK_INFO => Point::LastTrack,
            POINT_LEAD_OUT => Point::LeadOut,
            POINT_SESSION_B0 | POINT_SESSION_C0 => Point::SessionBoundary(value),
            _ => Point::Other(value),
        }
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> Self {
        match point {
            Point::Track(n) => n,
            Point::FirstTrack => POINT_FIRST_TRACK_INFO,
            Point::LastTrack => POINT_LAST_TRACK_INFO,
            Point::LeadOut => POINT_LEAD_OUT,
            Point::SessionBoundary(v) | Point::Other(v) => v,
        }
    }
}

impl Point {
    /// Does this entry describe a real track?
    pub fn is_track(&self) -> bool {
        matches!(self, Point::Track(_))
    }
}

/// ADR and control nibbles of a Q subchannel entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdrControl {
    /// Q subchannel mode
    pub adr: u8,
    /// Control flags (bit 2 set for data tracks)
    pub control: u8,
}

impl AdrControl {
    /// Un-swap the byte as stored in the descriptor (control high, ADR low)
    pub fn from_stored(byte: u8) -> Self {
        Self {
            adr: byte & 0x0F,
            control: byte >> 4,
        }
    }

    /// Byte in the usual TOC order (ADR high, control low)
    pub fn toc_byte(&self) -> u8 {
        (self.adr << 4) | (self.control & 0x0F)
    }
}

/// Minute/second/frame position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Msf {
    /// Minutes
    pub minute: u8,
    /// Seconds
    pub second: u8,
    /// Frames, 75 per second
    pub frame: u8,
}

impl Msf {
    /// Build from stored (minute, second, frame) bytes
    pub fn new(bytes: [u8; 3]) -> Self {
        Self {
            minute: bytes[0],
            second: bytes[1],
            frame: bytes[2],
        }
    }

    /// Logical block address, 00:02:00 being sector 0
    pub fn to_lba(&self) -> i32 {
        (self.minute as i32 * 60 + self.second as i32) * 75 + self.frame as i32 - 150
    }
}

impl std::fmt::Display for Msf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}

/// Name of the data file holding a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filename {
    /// 8-bit name, usable for extraction
    Narrow(String),
    /// UTF-16 name, decoded for display only
    Wide(String),
}

impl Filename {
    /// Name regardless of width
    pub fn as_str(&self) -> &str {
        match self {
            Filename::Narrow(name) | Filename::Wide(name) => name,
        }
    }
}

/// Sector layout of a real track; absent on pseudo entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackData {
    /// Storage mode
    pub mode: TrackMode,
    /// Bytes per sector in the data file
    pub sector_size: u16,
    /// Absolute first sector
    pub sec_first: u32,
    /// Byte offset of the track in the data file
    pub data_offset: u64,
    /// Pregap/track sector counts, if the entry has an index block
    pub index: Option<IndexBlock>,
    /// Data file name, if the entry has a filename record
    pub filename: Option<Filename>,
}

/// A track table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Position in the session's track table
    pub entry: usize,
    /// Byte offset of the entry in the descriptor
    pub record_offset: usize,
    /// Entry classifier
    pub point: Point,
    /// Track number field
    pub track_number: u8,
    /// ADR/control, un-swapped
    pub adr_control: AdrControl,
    /// Subchannels stored per sector
    pub num_subchannels: u8,
    /// Current position
    pub msf: Msf,
    /// Point-specific position
    pub point_msf: Msf,
    /// Sector layout for real tracks
    pub data: Option<TrackData>,
}

impl Track {
    /// Storage mode, for real tracks only
    pub fn mode(&self) -> Option<TrackMode> {
        self.data.as_ref().map(|d| d.mode)
    }

    /// Is this an extractable data track?
    pub fn is_data(&self) -> bool {
        self.mode().is_some_and(|m| m.is_data())
    }

    /// Is this a data or audio track?
    pub fn is_data_or_audio(&self) -> bool {
        self.mode().is_some_and(|m| m.is_data_or_audio())
    }

    /// First sector, for real tracks only
    pub fn sec_first(&self) -> Option<u32> {
        self.data.as_ref().map(|d| d.sec_first)
    }

    /// Short description of what a pseudo entry carries
    pub fn describe_point(&self) -> String {
        match self.point {
            Point::Track(n) => format!("track {}", n),
            Point::FirstTrack => format!(
                "first track {}, disc type {:02X}h",
                self.point_msf.minute, self.point_msf.second
            ),
            Point::LastTrack => format!("last track {}", self.point_msf.minute),
            Point::LeadOut => format!("lead-out at {}", self.point_msf),
            Point::SessionBoundary(v) => format!("session marker {:02X}h", v),
            Point::Other(v) => format!("point {:02X}h", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_classification() {
        assert_eq!(Point::from(0x01), Point::Track(1));
        assert_eq!(Point::from(0x99), Point::Track(0x99));
        assert_eq!(Point::from(0xA0), Point::FirstTrack);
        assert_eq!(Point::from(0xA1), Point::LastTrack);
        assert_eq!(Point::from(0xA2), Point::LeadOut);
        assert_eq!(Point::from(0xB0), Point::SessionBoundary(0xB0));
        assert_eq!(Point::from(0xC0), Point::SessionBoundary(0xC0));
        assert_eq!(Point::from(0x00), Point::Other(0));
        assert!(!Point::from(0xA2).is_track());
    }

    #[test]
    fn test_point_to_byte() {
        for value in [0x01u8, 0x42, 0xA0, 0xA1, 0xA2, 0xB0, 0xC0, 0xFF] {
            assert_eq!(u8::from(Point::from(value)), value);
        }
    }

    #[test]
    fn test_adr_control_unswap() {
        let ac = AdrControl::from_stored(0x41);
        assert_eq!(ac.adr, 1);
        assert_eq!(ac.control, 4);
        assert_eq!(ac.toc_byte(), 0x14);
    }

    #[test]
    fn test_msf() {
        let msf = Msf::new([0, 2, 0]);
        assert_eq!(msf.to_lba(), 0);
        assert_eq!(Msf::new([1, 0, 0]).to_lba(), 4350);
        assert_eq!(msf.to_string(), "00:02:00");
    }

    #[test]
    fn test_pseudo_entry_is_not_data() {
        let track = Track {
            entry: 0,
            record_offset: 0x70,
            point: Point::LeadOut,
            track_number: 0,
            adr_control: AdrControl::from_stored(0x41),
            num_subchannels: 0,
            msf: Msf::default(),
            point_msf: Msf::new([10, 0, 0]),
            data: None,
        };
        assert!(!track.is_data());
        assert!(!track.is_data_or_audio());
        assert_eq!(track.describe_point(), "lead-out at 10:00:00");
    }
}
