/*!
# mdsextract

A Rust library for reading MDS (Media Descriptor) optical disc image
descriptors and extracting a data track from the companion MDF file into a
plain ISO image.

## Features

- Decode the packed little-endian header, session, track, index and
  filename records with bounds checking
- Classify track table entries into real tracks and table-of-contents
  pseudo entries
- Select the first data track and compute its sector extent
- Stream user data out of raw sectors for CD (Mode 1, Mode 2, XA forms,
  subchannel) and DVD tracks

## Quick Start

```rust,no_run
use mdsextract::{Descriptor, ExtractOptions};

// Inspect a descriptor
let desc = Descriptor::open("game.mds")?;
println!("{} v{}.{}", desc.media_type(), desc.version().0, desc.version().1);
for track in desc.tracks() {
    println!("{}", track.describe_point());
}

// Extract the first data track
let summary = mdsextract::convert("game.mds", "game.iso", &ExtractOptions::default())?;
println!("{} bytes from {}", summary.bytes_written, summary.data_path.display());
# Ok::<(), mdsextract::MdsError>(())
```

## Modules

- `format`: record layouts, constants and track modes
- `image`: parsed descriptor model (Descriptor, Session, Track)
- `io`: descriptor reader, data file resolution and sector extraction
- `dump`: verbose diagnostic output
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Error types and Result alias
pub mod error;
/// Verbose diagnostic dump
pub mod dump;
/// MDS record layouts, constants and track modes
pub mod format;
/// Parsed descriptor data structures
pub mod image;
/// I/O operations for reading descriptors and extracting tracks
pub mod io;

// Re-export common types
pub use error::{MdsError, Result};
pub use format::{check_record_layouts, TrackMode, TrackmodeInfo};
pub use image::{
    AdrControl, Descriptor, Filename, Msf, Point, Session, Track, TrackData, TrackExtent,
};
pub use io::{convert, ExtractOptions, ExtractSummary};
