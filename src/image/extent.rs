/// Data track selection and extent calculation

use crate::error::{MdsError, Result};
use crate::format::TrackmodeInfo;
use crate::image::session::Session;
use crate::image::track::{Filename, Track};
use tracing::debug;

/// Sector range of the selected track and how to read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackExtent {
    /// Session owning the track
    pub session_number: u16,
    /// Point number of the track
    pub track_number: u8,
    /// Absolute first sector
    pub first_sector: u32,
    /// Number of sectors to extract
    pub sector_count: u64,
    /// Per-sector stride, data offset and length
    pub layout: TrackmodeInfo,
    /// Byte offset of the track in the data file
    pub data_offset: u64,
    /// Data file named by the track, if any
    pub filename: Option<Filename>,
    /// Last sector of the owning session
    pub session_sec_last: i32,
}

impl TrackExtent {
    /// Compute the extent of entry `index` in `session`
    ///
    /// The extent runs to the next entry's first sector when that entry is a
    /// real track, otherwise to the end of the session. Pseudo entries carry
    /// no usable first sector.
    pub fn for_track(session: &Session, index: usize) -> Result<Self> {
        let tracks = session.tracks();
        let track = tracks
            .get(index)
            .ok_or_else(|| MdsError::parse(session.record_offset, "track index out of range"))?;
        let data = track.data.as_ref().ok_or(MdsError::NoDataTrack)?;
        let track_number = u8::from(track.point);

        let first = data.sec_first as i64;
        let end = match tracks.get(index + 1).and_then(Track::sec_first) {
            Some(next_first) => next_first as i64,
            None => session.sec_last as i64,
        };
        if end < first {
            return Err(MdsError::InvalidExtent { first, end });
        }

        let layout = data.mode.info(data.sector_size)?;
        debug!(
            track = track_number,
            first,
            end,
            stride = layout.stride,
            "computed track extent"
        );

        Ok(Self {
            session_number: session.number,
            track_number,
            first_sector: data.sec_first,
            sector_count: (end - first) as u64,
            layout,
            data_offset: data.data_offset,
            filename: data.filename.clone(),
            session_sec_last: session.sec_last,
        })
    }

    /// Size of the extracted image in bytes
    pub fn output_len(&self) -> u64 {
        self.sector_count * self.layout.data_len as u64
    }

    /// Bytes of the data file the extent reaches into, or `None` on overflow
    pub fn required_len(&self) -> Option<u64> {
        if self.sector_count == 0 {
            return Some(self.data_offset);
        }
        (self.sector_count - 1)
            .checked_mul(self.layout.stride as u64)?
            .checked_add(self.data_offset)?
            .checked_add((self.layout.data_off + self.layout.data_len) as u64)
    }
}

/// Index of the first data track in a session, in table order
pub fn find_data_track(session: &Session) -> Option<usize> {
    session.tracks().iter().position(Track::is_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TrackMode;
    use crate::image::{AdrControl, Msf, Point, TrackData};

    fn entry(entry: usize, point: u8, mode: TrackMode, sec_first: u32) -> Track {
        let point = Point::from(point);
        Track {
            entry,
            record_offset: 0,
            point,
            track_number: 0,
            adr_control: AdrControl::from_stored(0x41),
            num_subchannels: 0,
            msf: Msf::default(),
            point_msf: Msf::default(),
            data: point.is_track().then(|| TrackData {
                mode,
                sector_size: 2352,
                sec_first,
                data_offset: sec_first as u64 * 2352,
                index: None,
                filename: None,
            }),
        }
    }

    fn session(entries: &[(u8, TrackMode, u32)], sec_last: i32) -> Session {
        let mut session = Session::with_capacity(1, -150, sec_last, 1, 2, 0x58, entries.len());
        for (i, &(point, mode, first)) in entries.iter().enumerate() {
            session.add_track(entry(i, point, mode, first));
        }
        session
    }

    #[test]
    fn test_extent_uses_gap_to_next_track() {
        let s = session(
            &[
                (0x01, TrackMode::Mode1, 0),
                (0x02, TrackMode::Audio, 150),
                (0xA2, TrackMode::None, 2000),
            ],
            5000,
        );
        let extent = TrackExtent::for_track(&s, 0).unwrap();
        assert_eq!(extent.sector_count, 150);
        assert_eq!(extent.track_number, 1);
    }

    #[test]
    fn test_extent_falls_back_to_session_end() {
        let s = session(
            &[(0x01, TrackMode::Mode1, 0), (0xA2, TrackMode::None, 0)],
            3000,
        );
        let extent = TrackExtent::for_track(&s, 0).unwrap();
        assert_eq!(extent.sector_count, 3000);
        assert_eq!(extent.output_len(), 3000 * 2048);
    }

    #[test]
    fn test_extent_negative_is_rejected() {
        let s = session(
            &[(0x01, TrackMode::Mode1, 500), (0x02, TrackMode::Mode1, 100)],
            3000,
        );
        let err = TrackExtent::for_track(&s, 0).unwrap_err();
        assert!(matches!(err, MdsError::InvalidExtent { first: 500, end: 100 }));
    }

    #[test]
    fn test_find_skips_pointers_and_audio() {
        let s = session(
            &[
                (0xA0, TrackMode::None, 0),
                (0xA1, TrackMode::None, 0),
                (0x01, TrackMode::Audio, 0),
                (0x02, TrackMode::Mode2Form1, 900),
            ],
            3000,
        );
        assert_eq!(find_data_track(&s), Some(3));
    }

    #[test]
    fn test_find_audio_only() {
        let s = session(&[(0x01, TrackMode::Audio, 0)], 3000);
        assert_eq!(find_data_track(&s), None);
    }

    #[test]
    fn test_required_len() {
        let s = session(&[(0x01, TrackMode::Mode1, 0)], 10);
        let extent = TrackExtent::for_track(&s, 0).unwrap();
        assert_eq!(extent.required_len(), Some(9 * 2352 + 16 + 2048));
    }
}
