use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MDS operations
pub type Result<T> = std::result::Result<T, MdsError>;

/// Errors that can occur when reading descriptors or extracting tracks
#[derive(Debug, Error)]
pub enum MdsError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be opened or mapped
    #[error("couldn't open '{}' for reading: {source}", path.display())]
    OpenFile {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying system error
        source: std::io::Error,
    },

    /// A record decoder does not match its fixed on-disk size
    #[error("bad size of {record} record: decoder covers {actual} bytes, expected {expected}")]
    Structural {
        /// Record name
        record: &'static str,
        /// Size the format requires
        expected: usize,
        /// Size the decoder actually consumes
        actual: usize,
    },

    /// Signature at the start of the descriptor is wrong
    #[error("not an mds file? bad magic in '{}'", path.display())]
    BadMagic {
        /// Descriptor path
        path: PathBuf,
    },

    /// Descriptor major version is newer than this reader understands
    #[error("unsupported descriptor version v{major}.{minor}")]
    UnsupportedVersion {
        /// Major version
        major: u8,
        /// Minor version
        minor: u8,
    },

    /// Track mode code with no known sector layout
    #[error("unknown track mode '{0:02X}h'")]
    UnknownTrackMode(u8),

    /// Track mode's user data does not fit in the track's sector size
    #[error("{mode} sector data {data_off:#x}+{data_len:#x} does not fit in sector size {stride:#x}")]
    SectorLayout {
        /// Track mode name
        mode: &'static str,
        /// Offset of the user data within a sector
        data_off: usize,
        /// User data bytes per sector
        data_len: usize,
        /// Declared bytes per sector
        stride: usize,
    },

    /// Track declares more than one filename record
    #[error("track entry {entry} declares {count} filenames, only one is supported")]
    TooManyFilenames {
        /// Index of the entry in its session's table
        entry: usize,
        /// Declared filename count
        count: u32,
    },

    /// Descriptor path cannot be turned into a data file path
    #[error("bad mds filename '{}': expected a three-letter extension ending in 's' or 'S'", path.display())]
    BadDescriptorName {
        /// Descriptor path
        path: PathBuf,
    },

    /// Filename record uses an encoding that cannot be used for extraction
    #[error("unsupported filename record: {0}")]
    UnsupportedFilename(String),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Error message
        message: String,
    },

    /// No extractable track in any session
    #[error("no data track found")]
    NoDataTrack,

    /// Requested track number does not exist or is not a data track
    #[error("track {0} not found or not a data track")]
    TrackNotFound(u8),

    /// Sector range of the selected track is empty or negative
    #[error("invalid extent: track starts at sector {first}, ends at sector {end}")]
    InvalidExtent {
        /// First sector of the track
        first: i64,
        /// Sector the extent runs up to
        end: i64,
    },

    /// Data file size differs from the pre-flight expectation
    #[error("mdf size of {actual} is different from expected {expected}")]
    SizeMismatch {
        /// Expected size in bytes
        expected: u64,
        /// Actual size in bytes
        actual: u64,
    },

    /// Data file ends before the selected extent does
    #[error("data file is {actual} bytes but the track needs {required}")]
    DataFileTooShort {
        /// Bytes required by the extent
        required: u64,
        /// Actual size in bytes
        actual: u64,
    },

    /// Output file exists and overwriting was not requested
    #[error("output file '{}' already exists (use --force to overwrite)", path.display())]
    OutputExists {
        /// Output path
        path: PathBuf,
    },
}

impl MdsError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: usize, message: S) -> Self {
        MdsError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an open-file error carrying the path
    pub fn open<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        MdsError::OpenFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MdsError::UnknownTrackMode(0xAE);
        assert_eq!(err.to_string(), "unknown track mode 'AEh'");
    }

    #[test]
    fn test_sector_layout_display() {
        let err = MdsError::SectorLayout {
            mode: "MODE1",
            data_off: 0x10,
            data_len: 0x800,
            stride: 0x800,
        };
        assert_eq!(
            err.to_string(),
            "MODE1 sector data 0x10+0x800 does not fit in sector size 0x800"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = MdsError::parse(0x70, "track table runs past end of descriptor");
        assert_eq!(
            err.to_string(),
            "Parse error at offset 112: track table runs past end of descriptor"
        );
    }

    #[test]
    fn test_bad_name_mentions_path() {
        let err = MdsError::BadDescriptorName {
            path: PathBuf::from("disc.img"),
        };
        assert!(err.to_string().contains("disc.img"));
    }
}
