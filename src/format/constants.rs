/// MDS format magic bytes and constants

/// Descriptor file signature
pub const MDS_SIGNATURE: &[u8; 16] = b"MEDIA DESCRIPTOR";

/// Highest descriptor major version this reader understands
pub const MAX_MAJOR_VERSION: u8 = 1;

/// Size of the descriptor header
pub const HEADER_SIZE: usize = 0x58;

/// Size of a session record
pub const SESSION_SIZE: usize = 0x18;

/// Size of a track (data block) record
pub const TRACK_SIZE: usize = 0x50;

/// Size of an index block record
pub const INDEX_BLOCK_SIZE: usize = 0x08;

/// Size of a filename record
pub const FILENAME_SIZE: usize = 0x10;

/// Highest point value that still denotes a real track
pub const POINT_LAST_TRACK: u8 = 0x99;

/// Point value: first track number and disc type
pub const POINT_FIRST_TRACK_INFO: u8 = 0xA0;

/// Point value: last track number
pub const POINT_LAST_TRACK_INFO: u8 = 0xA1;

/// Point value: lead-out position
pub const POINT_LEAD_OUT: u8 = 0xA2;

/// Point value: next-session boundary
pub const POINT_SESSION_B0: u8 = 0xB0;

/// Point value: first-session lead-in boundary
pub const POINT_SESSION_C0: u8 = 0xC0;

/// Filename record width flag for 8-bit names
pub const FILENAME_NARROW: u8 = 0;

/// Filename record width flag for UTF-16LE names
pub const FILENAME_WIDE: u8 = 1;

/// Media type codes
pub const MEDIA_CD_ROM: u16 = 0;
/// CD-R media
pub const MEDIA_CD_R: u16 = 1;
/// CD-RW media
pub const MEDIA_CD_RW: u16 = 2;
/// DVD-ROM media
pub const MEDIA_DVD_ROM: u16 = 16;
/// DVD-R media
pub const MEDIA_DVD_R: u16 = 18;

/// Get a display name for a media type code
pub fn media_type_name(media_type: u16) -> &'static str {
    match media_type {
        MEDIA_CD_ROM => "CD-ROM",
        MEDIA_CD_R => "CD-R",
        MEDIA_CD_RW => "CD-RW",
        MEDIA_DVD_ROM => "DVD-ROM",
        MEDIA_DVD_R => "DVD-R",
        _ => "(unknown)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_names() {
        assert_eq!(media_type_name(0), "CD-ROM");
        assert_eq!(media_type_name(16), "DVD-ROM");
        assert_eq!(media_type_name(18), "DVD-R");
        assert_eq!(media_type_name(7), "(unknown)");
    }

    #[test]
    fn test_signature_length() {
        assert_eq!(MDS_SIGNATURE.len(), 16);
    }
}
