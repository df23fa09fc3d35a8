/// Track storage modes and their per-sector data layout

use crate::error::{MdsError, Result};

/// Storage mode of a track's sectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackMode {
    /// No data (lead-in placeholder)
    None,
    /// Plain 2048-byte DVD sector
    Dvd,
    /// CD-DA audio
    Audio,
    /// CD-ROM Mode 1
    Mode1,
    /// CD-ROM Mode 2, raw payload
    Mode2,
    /// CD-ROM XA Mode 2 Form 1
    Mode2Form1,
    /// CD-ROM XA Mode 2 Form 2
    Mode2Form2,
    /// Mode 2 with interleaved subchannel data
    Mode2Sub,
}

/// Per-mode sector layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackmodeInfo {
    /// Mode this layout belongs to
    pub mode: TrackMode,
    /// User data bytes per sector
    pub data_len: usize,
    /// Offset of the user data within a sector
    pub data_off: usize,
    /// Bytes per sector in the data file, taken from the track record
    pub stride: usize,
}

/// Static table: (code, mode, data length, intra-sector offset)
static TRACKMODE_TABLE: [(u8, TrackMode, usize, usize); 8] = [
    (0x00, TrackMode::None, 0, 0),
    (0x02, TrackMode::Dvd, 0x800, 0),
    (0xA9, TrackMode::Audio, 0x930, 0),
    (0xAA, TrackMode::Mode1, 0x800, 0x10),
    (0xAB, TrackMode::Mode2, 0x920, 0x10),
    (0xAC, TrackMode::Mode2Form1, 0x800, 0x18),
    (0xAD, TrackMode::Mode2Form2, 0x914, 0x18),
    (0xEC, TrackMode::Mode2Sub, 0x990, 0),
];

impl TrackMode {
    /// Look up a stored mode code
    pub fn from_code(code: u8) -> Result<Self> {
        TRACKMODE_TABLE
            .iter()
            .find(|entry| entry.0 == code)
            .map(|entry| entry.1)
            .ok_or(MdsError::UnknownTrackMode(code))
    }

    /// Stored mode code
    pub fn code(&self) -> u8 {
        self.entry().0
    }

    /// User data bytes per sector
    pub fn data_len(&self) -> usize {
        self.entry().2
    }

    /// Offset of user data inside a sector
    pub fn data_off(&self) -> usize {
        self.entry().3
    }

    fn entry(&self) -> &'static (u8, TrackMode, usize, usize) {
        let idx = match self {
            TrackMode::None => 0,
            TrackMode::Dvd => 1,
            TrackMode::Audio => 2,
            TrackMode::Mode1 => 3,
            TrackMode::Mode2 => 4,
            TrackMode::Mode2Form1 => 5,
            TrackMode::Mode2Form2 => 6,
            TrackMode::Mode2Sub => 7,
        };
        &TRACKMODE_TABLE[idx]
    }

    /// Can this mode be extracted as a data track?
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            TrackMode::Dvd
                | TrackMode::Mode1
                | TrackMode::Mode2
                | TrackMode::Mode2Form1
                | TrackMode::Mode2Form2
                | TrackMode::Mode2Sub
        )
    }

    /// Data or audio content (anything but the lead-in placeholder)
    pub fn is_data_or_audio(&self) -> bool {
        self.is_data() || *self == TrackMode::Audio
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TrackMode::None => "(lead-in)",
            TrackMode::Dvd => "DVD",
            TrackMode::Audio => "AUDIO",
            TrackMode::Mode1 => "MODE1",
            TrackMode::Mode2 => "MODE2",
            TrackMode::Mode2Form1 => "MODE2_FORM1",
            TrackMode::Mode2Form2 => "MODE2_FORM2",
            TrackMode::Mode2Sub => "MODE2 (with subchannels)",
        }
    }

    /// Layout for a track of this mode stored with the given sector size
    pub fn info(&self, sector_size: u16) -> Result<TrackmodeInfo> {
        let info = TrackmodeInfo {
            mode: *self,
            data_len: self.data_len(),
            data_off: self.data_off(),
            stride: sector_size as usize,
        };
        if info.data_off + info.data_len > info.stride {
            return Err(MdsError::SectorLayout {
                mode: self.name(),
                data_off: info.data_off,
                data_len: info.data_len,
                stride: info.stride,
            });
        }
        Ok(info)
    }
}

impl std::fmt::Display for TrackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TrackmodeInfo {
    /// Can the extent be copied as one contiguous block?
    pub fn is_contiguous(&self) -> bool {
        self.data_len == self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(TrackMode::from_code(0xAA).unwrap(), TrackMode::Mode1);
        assert_eq!(TrackMode::from_code(0x02).unwrap(), TrackMode::Dvd);
        assert_eq!(TrackMode::from_code(0xEC).unwrap(), TrackMode::Mode2Sub);
    }

    #[test]
    fn test_unknown_mode() {
        let err = TrackMode::from_code(0xAE).unwrap_err();
        assert!(matches!(err, MdsError::UnknownTrackMode(0xAE)));
    }

    #[test]
    fn test_codes_round_trip_through_table() {
        for &(code, mode, _, _) in TRACKMODE_TABLE.iter() {
            assert_eq!(mode.code(), code);
            assert_eq!(TrackMode::from_code(code).unwrap(), mode);
        }
    }

    #[test]
    fn test_mode1_layout() {
        let info = TrackMode::Mode1.info(2352).unwrap();
        assert_eq!(info.data_len, 2048);
        assert_eq!(info.data_off, 16);
        assert_eq!(info.stride, 2352);
        assert!(!info.is_contiguous());

        let err = TrackMode::Mode1.info(2048).unwrap_err();
        assert!(matches!(
            err,
            MdsError::SectorLayout {
                mode: "MODE1",
                data_off: 0x10,
                data_len: 0x800,
                stride: 0x800,
            }
        ));
    }

    #[test]
    fn test_dvd_is_contiguous() {
        let info = TrackMode::Dvd.info(2048).unwrap();
        assert!(info.is_contiguous());
    }

    #[test]
    fn test_classification() {
        assert!(TrackMode::Mode2Form1.is_data());
        assert!(!TrackMode::Audio.is_data());
        assert!(TrackMode::Audio.is_data_or_audio());
        assert!(!TrackMode::None.is_data_or_audio());
    }
}
