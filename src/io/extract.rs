/// Sector extraction from the data file into a linear image

use crate::error::{MdsError, Result};
use crate::format::TrackmodeInfo;
use crate::image::{Descriptor, TrackExtent};
use crate::io::companion::open_data_file;
use crate::io::map_open_file;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Overwrite an existing output file
    pub force: bool,
    /// Require the data file to be exactly `stride * session end` bytes
    pub check_size: bool,
    /// Extract this track number instead of the first data track
    pub track: Option<u8>,
}

/// What a conversion run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Data file that was read
    pub data_path: PathBuf,
    /// Extent that was extracted
    pub extent: TrackExtent,
    /// Bytes written to the output
    pub bytes_written: u64,
}

/// Convert a descriptor and its data file into a linear image
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    mds_path: P,
    output: Q,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    let descriptor = Descriptor::open(mds_path)?;
    extract_descriptor(&descriptor, output.as_ref(), options)
}

/// Extract the selected track of an already parsed descriptor
pub fn extract_descriptor(
    descriptor: &Descriptor,
    output: &Path,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    let extent = match options.track {
        Some(number) => descriptor.track_extent(number)?,
        None => descriptor.data_track_extent()?,
    };
    info!(
        session = extent.session_number,
        track = extent.track_number,
        mode = %extent.layout.mode,
        sectors = extent.sector_count,
        "selected data track"
    );

    let (data_path, data_file) = open_data_file(descriptor.path(), extent.filename.as_ref())?;
    let data = map_open_file(&data_file, &data_path)?;
    let actual = data.len() as u64;

    if options.check_size {
        let expected = legacy_expected_size(&extent);
        if actual != expected {
            return Err(MdsError::SizeMismatch { expected, actual });
        }
    }

    let required = extent
        .required_len()
        .ok_or_else(|| MdsError::parse(0, "track extent overflows"))?;
    if required > actual {
        return Err(MdsError::DataFileTooShort { required, actual });
    }

    let file = create_output(output, options.force)?;
    let mut out = BufWriter::new(file);
    let bytes_written = write_extent(&data, &extent, &mut out)?;
    out.into_inner().map_err(|e| e.into_error())?;

    info!(output = %output.display(), bytes = bytes_written, "wrote image");
    Ok(ExtractSummary {
        data_path,
        extent,
        bytes_written,
    })
}

/// Size the data file must have under the pre-flight check
fn legacy_expected_size(extent: &TrackExtent) -> u64 {
    extent.layout.stride as u64 * extent.session_sec_last.max(0) as u64
}

/// Create the output file, refusing to replace one unless forced
pub fn create_output(path: &Path, force: bool) -> Result<File> {
    let result = if force {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    };
    result.map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => MdsError::OutputExists {
            path: path.to_path_buf(),
        },
        _ => MdsError::Io(e),
    })
}

/// Write the user data of every sector in the extent, returning bytes written
///
/// `data` must be at least [`TrackExtent::required_len`] bytes long.
pub fn write_extent<W: Write>(data: &[u8], extent: &TrackExtent, out: &mut W) -> Result<u64> {
    let base = usize::try_from(extent.data_offset)
        .map_err(|_| MdsError::parse(0, "track offset exceeds address space"))?;
    let count = usize::try_from(extent.sector_count)
        .map_err(|_| MdsError::parse(0, "sector count exceeds address space"))?;
    let data = data
        .get(base..)
        .ok_or(MdsError::DataFileTooShort {
            required: extent.data_offset,
            actual: data.len() as u64,
        })?;

    if extent.layout.is_contiguous() {
        debug!("data length equals stride, copying as one block");
        write_block(data, &extent.layout, count, out)
    } else {
        debug!("copying sector by sector");
        write_sectors(data, &extent.layout, count, out)
    }
}

/// Copy `count` sectors as one contiguous region
pub fn write_block<W: Write>(
    data: &[u8],
    layout: &TrackmodeInfo,
    count: usize,
    out: &mut W,
) -> Result<u64> {
    let start = layout.data_off;
    let len = count * layout.data_len;
    let region = data
        .get(start..start + len)
        .ok_or_else(|| too_short(start + len, data.len()))?;
    out.write_all(region)?;
    Ok(len as u64)
}

/// Copy the user data of `count` sectors one at a time
pub fn write_sectors<W: Write>(
    data: &[u8],
    layout: &TrackmodeInfo,
    count: usize,
    out: &mut W,
) -> Result<u64> {
    let mut written = 0u64;
    for sector in 0..count {
        let start = sector * layout.stride + layout.data_off;
        let chunk = data
            .get(start..start + layout.data_len)
            .ok_or_else(|| too_short(start + layout.data_len, data.len()))?;
        out.write_all(chunk)?;
        written += layout.data_len as u64;
    }
    Ok(written)
}

fn too_short(required: usize, actual: usize) -> MdsError {
    MdsError::DataFileTooShort {
        required: required as u64,
        actual: actual as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TrackMode;

    fn raw_sectors(count: usize, stride: usize) -> Vec<u8> {
        (0..count * stride).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_sector_loop_skips_headers() {
        let layout = TrackMode::Mode1.info(2352).unwrap();
        let data = raw_sectors(3, 2352);
        let mut out = Vec::new();
        let written = write_sectors(&data, &layout, 3, &mut out).unwrap();

        assert_eq!(written, 3 * 2048);
        assert_eq!(&out[..2048], &data[16..16 + 2048]);
        assert_eq!(&out[2048..4096], &data[2352 + 16..2352 + 16 + 2048]);
    }

    #[test]
    fn test_block_and_loop_agree() {
        let layout = TrackMode::Dvd.info(2048).unwrap();
        let data = raw_sectors(7, 2048);

        let mut block = Vec::new();
        let mut looped = Vec::new();
        write_block(&data, &layout, 7, &mut block).unwrap();
        write_sectors(&data, &layout, 7, &mut looped).unwrap();
        assert_eq!(block, looped);
        assert_eq!(block, data);
    }

    #[test]
    fn test_short_data_is_an_error() {
        let layout = TrackMode::Mode1.info(2352).unwrap();
        let data = raw_sectors(2, 2352);
        let err = write_sectors(&data, &layout, 3, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, MdsError::DataFileTooShort { .. }));
    }

    #[test]
    fn test_create_output_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.iso");
        std::fs::write(&path, b"keep me").unwrap();

        let err = create_output(&path, false).unwrap_err();
        assert!(matches!(err, MdsError::OutputExists { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");

        assert!(create_output(&path, true).is_ok());
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }
}
