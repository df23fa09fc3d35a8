/// MDS descriptor reader

use crate::error::{MdsError, Result};
use crate::format::constants::*;
use crate::format::layout::{read_narrow_string, read_wide_string};
use crate::format::{
    decode_at, validate_header, DescriptorHeader, FilenameRecord, IndexBlock, SessionRecord,
    TrackMode, TrackRecord,
};
use crate::image::{AdrControl, Descriptor, Filename, Msf, Point, Session, Track, TrackData};
use crate::io::map_file;
use std::path::Path;
use tracing::debug;

/// Read a descriptor file from disk
///
/// The file is memory-mapped for the duration of parsing only.
pub fn read_mds<P: AsRef<Path>>(path: P) -> Result<Descriptor> {
    let path = path.as_ref();
    let map = map_file(path)?;
    parse_descriptor(&map, path)
}

/// Parse a descriptor from its raw bytes
pub fn parse_descriptor(buf: &[u8], path: &Path) -> Result<Descriptor> {
    let header: DescriptorHeader = decode_at(buf, 0)?;
    validate_header(&header, path)?;
    debug!(
        version = %format!("{}.{}", header.major(), header.minor()),
        media = media_type_name(header.media_type),
        sessions = header.num_sessions,
        "read descriptor header"
    );

    let mut sessions = Vec::with_capacity(header.num_sessions as usize);
    for number in 0..header.num_sessions as usize {
        let offset = table_offset(header.session_offset, number, SESSION_SIZE)?;
        sessions.push(read_session(buf, offset)?);
    }

    Ok(Descriptor {
        header,
        sessions,
        path: path.to_path_buf(),
    })
}

/// Read a session record and its track table
fn read_session(buf: &[u8], offset: usize) -> Result<Session> {
    let record: SessionRecord = decode_at(buf, offset)?;
    debug!(
        session = record.session_number,
        sec_first = record.sec_first,
        sec_last = record.sec_last,
        entries = record.num_blocks,
        "read session"
    );

    let num_entries = record.num_blocks as usize;
    let mut session = Session::with_capacity(
        record.session_number,
        record.sec_first,
        record.sec_last,
        record.first_track,
        record.last_track,
        offset,
        num_entries,
    );

    for entry in 0..num_entries {
        let track_offset = table_offset(record.track_table_offset, entry, TRACK_SIZE)?;
        session.add_track(read_track(buf, entry, track_offset)?);
    }

    Ok(session)
}

/// Read a single track table entry
fn read_track(buf: &[u8], entry: usize, offset: usize) -> Result<Track> {
    let record: TrackRecord = decode_at(buf, offset)?;

    if record.num_filenames > 1 {
        return Err(MdsError::TooManyFilenames {
            entry,
            count: record.num_filenames,
        });
    }

    let point = Point::from(record.point);
    let data = if point.is_track() {
        Some(read_track_data(buf, &record)?)
    } else {
        None
    };

    debug!(
        entry,
        point = record.point,
        mode = record.mode,
        sector_size = record.sector_size,
        sec_first = record.sec_first,
        "read track entry"
    );

    Ok(Track {
        entry,
        record_offset: offset,
        point,
        track_number: record.track_number,
        adr_control: AdrControl::from_stored(record.adr_control),
        num_subchannels: record.num_subchannels,
        msf: Msf::new(record.msf),
        point_msf: Msf::new(record.point_msf),
        data,
    })
}

/// Decode the sector layout fields of a real track
fn read_track_data(buf: &[u8], record: &TrackRecord) -> Result<TrackData> {
    let mode = TrackMode::from_code(record.mode)?;

    let index = if record.index_block_offset != 0 {
        Some(decode_at::<IndexBlock>(buf, record.index_block_offset as usize)?)
    } else {
        None
    };

    let filename = if record.num_filenames == 1 {
        Some(read_filename(buf, record.filenames_offset as usize)?)
    } else {
        None
    };

    Ok(TrackData {
        mode,
        sector_size: record.sector_size,
        sec_first: record.sec_first,
        data_offset: record.data_offset,
        index,
        filename,
    })
}

/// Decode a filename record and copy out the string it points at
fn read_filename(buf: &[u8], offset: usize) -> Result<Filename> {
    let record: FilenameRecord = decode_at(buf, offset)?;
    let name_offset = record.name_offset as usize;
    match record.width {
        FILENAME_NARROW => Ok(Filename::Narrow(read_narrow_string(buf, name_offset)?)),
        FILENAME_WIDE => Ok(Filename::Wide(read_wide_string(buf, name_offset)?)),
        other => Err(MdsError::UnsupportedFilename(format!(
            "unknown character width flag {:#04x}",
            other
        ))),
    }
}

/// Offset of the `index`th fixed-size record in a table
fn table_offset(base: u32, index: usize, size: usize) -> Result<usize> {
    index
        .checked_mul(size)
        .and_then(|rel| rel.checked_add(base as usize))
        .ok_or_else(|| MdsError::parse(base as usize, "record table offset overflows"))
}
