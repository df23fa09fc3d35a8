/// Binary layout decoder for descriptor records
///
/// Every record is a fixed-size little-endian window. Decoding copies the
/// window field by field into a typed record; encoding is the inverse and is
/// used to build descriptors in tests and tools.

use crate::error::{MdsError, Result};
use crate::format::constants::*;

/// Sequential little-endian reader over a record window
///
/// Reads past the end of the window yield zero bytes but still advance the
/// position, so a decoder that consumes the wrong number of bytes is caught
/// by [`check_record_layouts`] rather than by a panic.
pub struct LeCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> LeCursor<'a> {
    /// Create a cursor at the start of a window
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read a fixed-size byte array
    pub fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(src) = self.buf.get(self.pos..self.pos + N) {
            out.copy_from_slice(src);
        }
        self.pos += N;
        out
    }

    /// Skip reserved bytes
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    /// Read a byte
    pub fn u8(&mut self) -> u8 {
        self.bytes::<1>()[0]
    }

    /// Read a little-endian u16
    pub fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.bytes())
    }

    /// Read a little-endian u32
    pub fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.bytes())
    }

    /// Read a little-endian i32
    pub fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.bytes())
    }

    /// Read a little-endian u64
    pub fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.bytes())
    }
}

/// Sequential little-endian writer for record encoding
#[derive(Default)]
pub struct LeWriter {
    out: Vec<u8>,
}

impl LeWriter {
    /// Append raw bytes
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Append `n` zero bytes for a reserved area
    pub fn put_zeros(&mut self, n: usize) {
        self.out.resize(self.out.len() + n, 0);
    }

    /// Append a byte
    pub fn put_u8(&mut self, v: u8) {
        self.out.push(v);
    }

    /// Append a little-endian u16
    pub fn put_u16(&mut self, v: u16) {
        self.put_bytes(&v.to_le_bytes());
    }

    /// Append a little-endian u32
    pub fn put_u32(&mut self, v: u32) {
        self.put_bytes(&v.to_le_bytes());
    }

    /// Append a little-endian i32
    pub fn put_i32(&mut self, v: i32) {
        self.put_bytes(&v.to_le_bytes());
    }

    /// Append a little-endian u64
    pub fn put_u64(&mut self, v: u64) {
        self.put_bytes(&v.to_le_bytes());
    }

    /// Take the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

/// A fixed-size packed record in the descriptor file
pub trait Record: Sized + Default {
    /// Record name used in diagnostics
    const NAME: &'static str;
    /// Exact on-disk size in bytes
    const SIZE: usize;

    /// Decode the record from a cursor positioned at its first byte
    fn read(cur: &mut LeCursor<'_>) -> Self;

    /// Encode the record, reserved areas zero-filled
    fn write(&self, out: &mut LeWriter);

    /// Encode the record into a new buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = LeWriter::default();
        self.write(&mut out);
        out.into_bytes()
    }
}

/// Borrow `len` bytes at `offset`, failing if the window leaves the buffer
pub fn window(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| {
            MdsError::parse(
                offset,
                format!("{} byte window runs past end of {} byte descriptor", len, buf.len()),
            )
        })
}

/// Decode a record at a byte offset after checking its window bounds
pub fn decode_at<T: Record>(buf: &[u8], offset: usize) -> Result<T> {
    let bytes = window(buf, offset, T::SIZE)?;
    Ok(T::read(&mut LeCursor::new(bytes)))
}

/// Read a NUL-terminated 8-bit string starting at `offset`
pub fn read_narrow_string(buf: &[u8], offset: usize) -> Result<String> {
    let tail = buf
        .get(offset..)
        .ok_or_else(|| MdsError::parse(offset, "filename offset past end of descriptor"))?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| MdsError::parse(offset, "unterminated filename"))?;
    Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
}

/// Read a NUL-terminated UTF-16LE string starting at `offset`
pub fn read_wide_string(buf: &[u8], offset: usize) -> Result<String> {
    let tail = buf
        .get(offset..)
        .ok_or_else(|| MdsError::parse(offset, "filename offset past end of descriptor"))?;
    let units: Vec<u16> = tail
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    if units.len() * 2 + 2 > tail.len() {
        return Err(MdsError::parse(offset, "unterminated wide filename"));
    }
    Ok(String::from_utf16_lossy(&units))
}

/// Descriptor file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptorHeader {
    /// Signature, "MEDIA DESCRIPTOR" in valid files
    pub magic: [u8; 16],
    /// Format version as (major, minor)
    pub version: [u8; 2],
    /// Media type code
    pub media_type: u16,
    /// Number of session records
    pub num_sessions: u16,
    /// Length of the BCA block
    pub bca_len: u16,
    /// Offset of the BCA block
    pub bca_offset: u32,
    /// Offset of the disc structure block (DVD only)
    pub disc_structure_offset: u32,
    /// Offset of the first session record
    pub session_offset: u32,
    /// Offset of the DPM block
    pub dpm_offset: u32,
}

impl DescriptorHeader {
    /// Major version number
    pub fn major(&self) -> u8 {
        self.version[0]
    }

    /// Minor version number
    pub fn minor(&self) -> u8 {
        self.version[1]
    }

    /// Does the signature match exactly?
    pub fn has_valid_magic(&self) -> bool {
        &self.magic == MDS_SIGNATURE
    }
}

impl Record for DescriptorHeader {
    const NAME: &'static str = "header";
    const SIZE: usize = HEADER_SIZE;

    fn read(cur: &mut LeCursor<'_>) -> Self {
        let magic = cur.bytes();
        let version = cur.bytes();
        let media_type = cur.u16();
        let num_sessions = cur.u16();
        cur.skip(4);
        let bca_len = cur.u16();
        cur.skip(8);
        let bca_offset = cur.u32();
        cur.skip(0x18);
        let disc_structure_offset = cur.u32();
        cur.skip(0x0C);
        let session_offset = cur.u32();
        let dpm_offset = cur.u32();

        Self {
            magic,
            version,
            media_type,
            num_sessions,
            bca_len,
            bca_offset,
            disc_structure_offset,
            session_offset,
            dpm_offset,
        }
    }

    fn write(&self, out: &mut LeWriter) {
        out.put_bytes(&self.magic);
        out.put_bytes(&self.version);
        out.put_u16(self.media_type);
        out.put_u16(self.num_sessions);
        out.put_zeros(4);
        out.put_u16(self.bca_len);
        out.put_zeros(8);
        out.put_u32(self.bca_offset);
        out.put_zeros(0x18);
        out.put_u32(self.disc_structure_offset);
        out.put_zeros(0x0C);
        out.put_u32(self.session_offset);
        out.put_u32(self.dpm_offset);
    }
}

/// Session record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionRecord {
    /// First sector of the session (negative for the pregap)
    pub sec_first: i32,
    /// Sector where the session ends
    pub sec_last: i32,
    /// Session number, starting at 1
    pub session_number: u16,
    /// Number of entries in the track table
    pub num_blocks: u8,
    /// Redundant entry count; not consulted
    pub num_blocks_alt: u8,
    /// First track number
    pub first_track: u16,
    /// Last track number
    pub last_track: u16,
    /// Offset of the track table
    pub track_table_offset: u32,
}

impl Record for SessionRecord {
    const NAME: &'static str = "session";
    const SIZE: usize = SESSION_SIZE;

    fn read(cur: &mut LeCursor<'_>) -> Self {
        let sec_first = cur.i32();
        let sec_last = cur.i32();
        let session_number = cur.u16();
        let num_blocks = cur.u8();
        let num_blocks_alt = cur.u8();
        let first_track = cur.u16();
        let last_track = cur.u16();
        cur.skip(4);
        let track_table_offset = cur.u32();

        Self {
            sec_first,
            sec_last,
            session_number,
            num_blocks,
            num_blocks_alt,
            first_track,
            last_track,
            track_table_offset,
        }
    }

    fn write(&self, out: &mut LeWriter) {
        out.put_i32(self.sec_first);
        out.put_i32(self.sec_last);
        out.put_u16(self.session_number);
        out.put_u8(self.num_blocks);
        out.put_u8(self.num_blocks_alt);
        out.put_u16(self.first_track);
        out.put_u16(self.last_track);
        out.put_zeros(4);
        out.put_u32(self.track_table_offset);
    }
}

/// Track table entry, including pseudo entries for points >= 0xA0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackRecord {
    /// Storage mode code
    pub mode: u8,
    /// Number of subchannels stored per sector
    pub num_subchannels: u8,
    /// ADR/control byte as stored (nibbles swapped)
    pub adr_control: u8,
    /// Track number
    pub track_number: u8,
    /// Point classifier
    pub point: u8,
    /// Current position (minute, second, frame)
    pub msf: [u8; 3],
    /// Point-specific position (minute, second, frame)
    pub point_msf: [u8; 3],
    /// Offset of the index block
    pub index_block_offset: u32,
    /// Bytes per sector in the data file
    pub sector_size: u16,
    /// Absolute first sector
    pub sec_first: u32,
    /// Byte offset of the track in the data file
    pub data_offset: u64,
    /// Number of filename records
    pub num_filenames: u32,
    /// Offset of the filename table
    pub filenames_offset: u32,
}

impl Record for TrackRecord {
    const NAME: &'static str = "track";
    const SIZE: usize = TRACK_SIZE;

    fn read(cur: &mut LeCursor<'_>) -> Self {
        let mode = cur.u8();
        let num_subchannels = cur.u8();
        let adr_control = cur.u8();
        let track_number = cur.u8();
        let point = cur.u8();
        let msf = cur.bytes();
        cur.skip(1);
        let point_msf = cur.bytes();
        let index_block_offset = cur.u32();
        let sector_size = cur.u16();
        cur.skip(0x12);
        let sec_first = cur.u32();
        let data_offset = cur.u64();
        let num_filenames = cur.u32();
        let filenames_offset = cur.u32();
        cur.skip(0x18);

        Self {
            mode,
            num_subchannels,
            adr_control,
            track_number,
            point,
            msf,
            point_msf,
            index_block_offset,
            sector_size,
            sec_first,
            data_offset,
            num_filenames,
            filenames_offset,
        }
    }

    fn write(&self, out: &mut LeWriter) {
        out.put_u8(self.mode);
        out.put_u8(self.num_subchannels);
        out.put_u8(self.adr_control);
        out.put_u8(self.track_number);
        out.put_u8(self.point);
        out.put_bytes(&self.msf);
        out.put_zeros(1);
        out.put_bytes(&self.point_msf);
        out.put_u32(self.index_block_offset);
        out.put_u16(self.sector_size);
        out.put_zeros(0x12);
        out.put_u32(self.sec_first);
        out.put_u64(self.data_offset);
        out.put_u32(self.num_filenames);
        out.put_u32(self.filenames_offset);
        out.put_zeros(0x18);
    }
}

/// Index block: sector counts for index 0 (pregap) and index 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexBlock {
    /// Sectors in index 0 (pregap)
    pub index0_sectors: u32,
    /// Sectors in index 1 (track body)
    pub index1_sectors: u32,
}

impl Record for IndexBlock {
    const NAME: &'static str = "index block";
    const SIZE: usize = INDEX_BLOCK_SIZE;

    fn read(cur: &mut LeCursor<'_>) -> Self {
        Self {
            index0_sectors: cur.u32(),
            index1_sectors: cur.u32(),
        }
    }

    fn write(&self, out: &mut LeWriter) {
        out.put_u32(self.index0_sectors);
        out.put_u32(self.index1_sectors);
    }
}

/// Filename record pointing at a NUL-terminated name elsewhere in the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilenameRecord {
    /// Offset of the name string
    pub name_offset: u32,
    /// Character width flag (0 = 8-bit, 1 = UTF-16LE)
    pub width: u8,
}

impl Record for FilenameRecord {
    const NAME: &'static str = "filename";
    const SIZE: usize = FILENAME_SIZE;

    fn read(cur: &mut LeCursor<'_>) -> Self {
        let name_offset = cur.u32();
        let width = cur.u8();
        cur.skip(11);
        Self { name_offset, width }
    }

    fn write(&self, out: &mut LeWriter) {
        out.put_u32(self.name_offset);
        out.put_u8(self.width);
        out.put_zeros(11);
    }
}

fn check_layout<T: Record>() -> Result<()> {
    let zeros = vec![0u8; T::SIZE * 2];
    let mut cur = LeCursor::new(&zeros);
    T::read(&mut cur);
    let encoded = T::default().to_bytes().len();

    for actual in [cur.position(), encoded] {
        if actual != T::SIZE {
            return Err(MdsError::Structural {
                record: T::NAME,
                expected: T::SIZE,
                actual,
            });
        }
    }
    Ok(())
}

/// Verify every record decoder and encoder covers exactly its fixed size
///
/// Run once at startup; a failure means the decoder itself is broken.
pub fn check_record_layouts() -> Result<()> {
    check_layout::<DescriptorHeader>()?;
    check_layout::<SessionRecord>()?;
    check_layout::<TrackRecord>()?;
    check_layout::<IndexBlock>()?;
    check_layout::<FilenameRecord>()?;
    Ok(())
}
