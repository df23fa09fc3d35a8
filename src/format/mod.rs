/// MDS format constants, record layouts and track modes

/// Format constants
pub mod constants;
/// Binary record decoder
pub mod layout;
/// Track mode table
pub mod trackmode;

pub use constants::*;
pub use layout::{
    check_record_layouts, decode_at, DescriptorHeader, FilenameRecord, IndexBlock, Record,
    SessionRecord, TrackRecord,
};
pub use trackmode::{TrackMode, TrackmodeInfo};

use crate::error::{MdsError, Result};
use std::path::Path;

/// Check the header signature and version before anything else is parsed
pub fn validate_header(header: &DescriptorHeader, path: &Path) -> Result<()> {
    if !header.has_valid_magic() {
        return Err(MdsError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    if header.major() > MAX_MAJOR_VERSION {
        return Err(MdsError::UnsupportedVersion {
            major: header.major(),
            minor: header.minor(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: [u8; 2]) -> DescriptorHeader {
        DescriptorHeader {
            magic: *MDS_SIGNATURE,
            version,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_known_versions() {
        let path = Path::new("disc.mds");
        assert!(validate_header(&header([0, 9]), path).is_ok());
        assert!(validate_header(&header([1, 5]), path).is_ok());
    }

    #[test]
    fn test_rejects_newer_major() {
        let err = validate_header(&header([2, 0]), Path::new("disc.mds")).unwrap_err();
        assert!(matches!(
            err,
            MdsError::UnsupportedVersion { major: 2, minor: 0 }
        ));
    }

    #[test]
    fn test_rejects_any_changed_magic_byte() {
        for i in 0..16 {
            let mut h = header([1, 3]);
            h.magic[i] ^= 0x20;
            let err = validate_header(&h, Path::new("disc.mds")).unwrap_err();
            assert!(matches!(err, MdsError::BadMagic { .. }), "byte {}", i);
        }
    }
}
