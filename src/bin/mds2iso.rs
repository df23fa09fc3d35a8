/// Command-line converter from MDS/MDF disc images to ISO images

use clap::Parser;
use mdsextract::dump::{dump_descriptor, dump_raw_records};
use mdsextract::io::{extract_descriptor, map_file, parse_descriptor};
use mdsextract::{check_record_layouts, ExtractOptions, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Extract the data track of an MDS/MDF image into an ISO file
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Descriptor (.mds) file to read
    #[arg(short, long, value_name = "MDSFILE")]
    input: PathBuf,

    /// ISO file to write
    #[arg(short, long, value_name = "ISOFILE")]
    output: PathBuf,

    /// Dump every descriptor record to stdout
    #[arg(short, long)]
    verbose: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    force: bool,

    /// Require the data file to be exactly sector size times session length
    #[arg(long)]
    check_size: bool,

    /// Extract this track number instead of the first data track
    #[arg(short, long, value_name = "NUMBER")]
    track: Option<u8>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", progname(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    check_record_layouts()?;

    // The descriptor mapping is dropped before the data file is opened
    let descriptor = {
        let map = map_file(&args.input)?;
        let descriptor = match parse_descriptor(&map, &args.input) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                if args.verbose {
                    let mut stdout = std::io::stdout().lock();
                    dump_raw_records(&mut stdout, &map)?;
                    stdout.flush()?;
                }
                return Err(e);
            }
        };
        if args.verbose {
            let mut stdout = std::io::stdout().lock();
            dump_descriptor(&mut stdout, &map, &descriptor)?;
            stdout.flush()?;
        }
        descriptor
    };

    let options = ExtractOptions {
        force: args.force,
        check_size: args.check_size,
        track: args.track,
    };
    let summary = extract_descriptor(&descriptor, &args.output, &options)?;

    if args.verbose {
        let layout = &summary.extent.layout;
        println!();
        println!("trackinfo:");
        println!("data file: {}", summary.data_path.display());
        println!("data_stride: {:x}h", layout.stride);
        println!("data_off: {:x}h", layout.data_off);
        println!("data_len: {:x}h", layout.data_len);
        println!("sectors: {}", summary.extent.sector_count);
        println!("written: {} bytes", summary.bytes_written);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Name this program was invoked as
fn progname() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
