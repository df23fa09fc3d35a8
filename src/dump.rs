/// Verbose diagnostic dump of a descriptor

use crate::format::{decode_at, DescriptorHeader, Record, SessionRecord, TrackRecord};
use crate::image::{Descriptor, Filename, Track};
use std::io::{self, Write};

/// Write a hex + ASCII dump, 16 bytes per line
pub fn hex_dump<W: Write>(out: &mut W, data: &[u8], max_bytes: usize) -> io::Result<()> {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        write!(out, "{:04X}: ", i * 16)?;

        for (j, byte) in chunk.iter().enumerate() {
            write!(out, "{:02X} ", byte)?;
            if j == 7 {
                write!(out, " ")?;
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            write!(out, "   ")?;
            if j == 7 {
                write!(out, " ")?;
            }
        }

        write!(out, " |")?;
        for byte in chunk {
            let c = if *byte >= 32 && *byte < 127 {
                *byte as char
            } else {
                '.'
            };
            write!(out, "{}", c)?;
        }
        writeln!(out, "|")?;
    }

    if data.len() > max_bytes {
        writeln!(out, "... ({} more bytes)", data.len() - max_bytes)?;
    }
    Ok(())
}

/// Dump the raw record bytes at `offset`, if they lie within `raw`
fn dump_record<W: Write>(out: &mut W, raw: &[u8], offset: usize, size: usize) -> io::Result<()> {
    match raw.get(offset..offset + size) {
        Some(bytes) => hex_dump(out, bytes, size),
        None => writeln!(out, "(record at {:08x} outside descriptor)", offset),
    }
}

/// Write every decoded record of a descriptor, each preceded by its raw bytes
///
/// `raw` is the descriptor's content as parsed; it may be empty to skip the
/// hex dumps.
pub fn dump_descriptor<W: Write>(out: &mut W, raw: &[u8], desc: &Descriptor) -> io::Result<()> {
    let header = desc.header();
    dump_record(out, raw, 0, DescriptorHeader::SIZE)?;
    let (major, minor) = desc.version();
    writeln!(out, "version: v{}.{}", major, minor)?;
    writeln!(out, "media: {}", desc.media_type())?;
    writeln!(out, "sessions: {}", header.num_sessions)?;
    writeln!(out, "disc off: {:08x}", header.disc_structure_offset)?;
    writeln!(out, "session off: {:08x}", header.session_offset)?;
    writeln!(out, "dpm off: {:08x}", header.dpm_offset)?;

    for session in desc.sessions() {
        writeln!(out)?;
        dump_record(out, raw, session.record_offset, SessionRecord::SIZE)?;
        writeln!(out, "session: {}", session.number)?;
        writeln!(out, "sec_first: {}", session.sec_first)?;
        writeln!(out, "sec_last: {}", session.sec_last)?;
        writeln!(out, "entries: {}", session.track_count())?;
        writeln!(out, "track_first: {}", session.first_track)?;
        writeln!(out, "track_last: {}", session.last_track)?;

        for track in session.tracks() {
            dump_track(out, raw, track)?;
        }
    }
    Ok(())
}

/// Hex-dump every record reachable from the header without interpreting it
///
/// Used when a descriptor fails to parse, so the records leading up to the
/// failure are still visible. The walk stops at the first record that lies
/// outside `raw`.
pub fn dump_raw_records<W: Write>(out: &mut W, raw: &[u8]) -> io::Result<()> {
    let Ok(header) = decode_at::<DescriptorHeader>(raw, 0) else {
        return writeln!(out, "(descriptor shorter than its header)");
    };
    dump_record(out, raw, 0, DescriptorHeader::SIZE)?;
    writeln!(out, "version: v{}.{}", header.major(), header.minor())?;
    writeln!(out, "sessions: {}", header.num_sessions)?;

    for number in 0..header.num_sessions as usize {
        let offset =
            (header.session_offset as usize).saturating_add(number * SessionRecord::SIZE);
        let Ok(session) = decode_at::<SessionRecord>(raw, offset) else {
            return writeln!(out, "(session record at {:08x} outside descriptor)", offset);
        };
        writeln!(out)?;
        dump_record(out, raw, offset, SessionRecord::SIZE)?;
        writeln!(out, "session: {}", session.session_number)?;
        writeln!(out, "entries: {}", session.num_blocks)?;

        for entry in 0..session.num_blocks as usize {
            let offset =
                (session.track_table_offset as usize).saturating_add(entry * TrackRecord::SIZE);
            let Ok(track) = decode_at::<TrackRecord>(raw, offset) else {
                return writeln!(out, "(track record at {:08x} outside descriptor)", offset);
            };
            writeln!(out, "data block {}", entry)?;
            dump_record(out, raw, offset, TrackRecord::SIZE)?;
            writeln!(out, "\tpoint: {:02X}h", track.point)?;
            writeln!(out, "\ttrackmode: {:02X}h", track.mode)?;
            writeln!(out, "\tsecsize: {:x}h", track.sector_size)?;
            writeln!(out, "\tfilenames: {}", track.num_filenames)?;
        }
    }
    Ok(())
}

fn dump_track<W: Write>(out: &mut W, raw: &[u8], track: &Track) -> io::Result<()> {
    writeln!(out, "data block {}", track.entry)?;
    dump_record(out, raw, track.record_offset, TrackRecord::SIZE)?;
    writeln!(out, "\tpoint: {:02X}h ({})", u8::from(track.point), track.describe_point())?;
    writeln!(out, "\tadr/ctl: {:02X}h", track.adr_control.toc_byte())?;
    writeln!(out, "\ttrackno: {}", track.track_number)?;
    writeln!(out, "\tnumsubchannels: {}", track.num_subchannels)?;
    writeln!(out, "\tmsf: {}", track.msf)?;
    writeln!(out, "\tpoint msf: {}", track.point_msf)?;

    let Some(data) = &track.data else {
        return Ok(());
    };
    writeln!(out, "\ttrackmode: {}", data.mode)?;
    writeln!(out, "\tsecsize: {:x}h", data.sector_size)?;
    writeln!(out, "\tsec_first: {}", data.sec_first)?;
    writeln!(out, "\tsec_off: {:016x}", data.data_offset)?;
    if let Some(index) = &data.index {
        writeln!(
            out,
            "\tindex: {} pregap sectors, {} track sectors",
            index.index0_sectors, index.index1_sectors
        )?;
    }
    match &data.filename {
        Some(Filename::Narrow(name)) => writeln!(out, "\tfilename: {}", name)?,
        Some(Filename::Wide(name)) => writeln!(out, "\tfilename (wide): {}", name)?,
        None => {}
    }
    if let Ok(info) = data.mode.info(data.sector_size) {
        writeln!(out, "\tdata_stride: {:x}h", info.stride)?;
        writeln!(out, "\tdata_off: {:x}h", info.data_off)?;
        writeln!(out, "\tdata_len: {:x}h", info.data_len)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_line() {
        let mut out = Vec::new();
        hex_dump(&mut out, b"MEDIA DESCRIPTOR", 16).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "0000: 4D 45 44 49 41 20 44 45  53 43 52 49 50 54 4F 52  |MEDIA DESCRIPTOR|\n"
        );
    }

    #[test]
    fn test_raw_records_of_short_descriptor() {
        let mut out = Vec::new();
        dump_raw_records(&mut out, b"MEDIA").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "(descriptor shorter than its header)\n");
    }

    #[test]
    fn test_raw_records_stop_at_missing_session() {
        let header = DescriptorHeader {
            magic: *crate::format::constants::MDS_SIGNATURE,
            version: [1, 5],
            num_sessions: 1,
            session_offset: 0x1000,
            ..Default::default()
        };
        let mut out = Vec::new();
        dump_raw_records(&mut out, &header.to_bytes()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("|MEDIA DESCRIPTOR|"));
        assert!(text.contains("version: v1.5"));
        assert!(text.ends_with("(session record at 00001000 outside descriptor)\n"));
    }

    #[test]
    fn test_hex_dump_truncates() {
        let mut out = Vec::new();
        hex_dump(&mut out, &[0u8; 40], 20).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("0000: "));
        assert!(text.contains("0010: 00 00 00 00"));
        assert!(text.ends_with("... (20 more bytes)\n"));
    }
}
