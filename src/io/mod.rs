/// I/O operations for reading descriptors and extracting tracks

/// Companion data file resolution
pub mod companion;
/// Sector extraction
pub mod extract;
/// Reader implementation for MDS descriptors
pub mod reader;

pub use companion::{embedded_data_path, fallback_data_path, open_data_file};
pub use extract::{
    convert, create_output, extract_descriptor, write_extent, ExtractOptions, ExtractSummary,
};
pub use reader::{parse_descriptor, read_mds};

use crate::error::{MdsError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Map a file read-only
pub fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| MdsError::open(path, e))?;
    map_open_file(&file, path)
}

/// Map an already opened file read-only
pub fn map_open_file(file: &File, path: &Path) -> Result<Mmap> {
    // SAFETY: the mapping is read-only and only lives for one parse or
    // extraction pass; the file is not modified by this process meanwhile.
    unsafe { Mmap::map(file) }.map_err(|e| MdsError::open(path, e))
}
