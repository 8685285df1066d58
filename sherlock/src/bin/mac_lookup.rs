//! Resolve a MAC address to its vendor.
//!
//! Reads `{"mac_address": "..."}` from stdin and prints
//! `{"manufacturer": ..., "comment": ...}` or `{"error": "..."}`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use sherlock::vendor::{EmbeddedOui, ManufDatabase, VendorLookupResult, VendorRepository, lookup_vendor};
use sherlock::{VendorLookupRequest, logging, report};

#[derive(Parser, Debug)]
#[command(name = "mac-lookup")]
#[command(version)]
#[command(about = "Look up the manufacturer of a MAC address", long_about = None)]
struct Args {
    /// Wireshark `manuf` file; the embedded OUI database is used otherwise
    #[arg(long, env = "SHERLOCK_MANUF")]
    manuf: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long, env = "SHERLOCK_LOG_DIR", default_value = logging::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init("mac_lookup", &args.log_dir, "debug");

    report::emit(run(&args))
}

fn run(args: &Args) -> sherlock::Result<VendorLookupResult> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    debug!("raw input received: {}", raw.trim());

    let request = VendorLookupRequest::from_json(&raw)?;

    let repository: Box<dyn VendorRepository> = match &args.manuf {
        Some(path) => Box::new(ManufDatabase::load(path)?),
        None => Box::new(EmbeddedOui::load()?),
    };

    lookup_vendor(repository.as_ref(), &request)
}
