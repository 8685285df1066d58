//! Run one command on a network device.
//!
//! Reads `{"device": {...}, "command": "...", "use_textfsm": true}` from
//! stdin and prints the output (records or text) or `{"error": "..."}`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{debug, warn};

use sherlock::{
    CommandOutput, CommandRequest, RunnerOptions, SshConnector, TemplateIndex, logging, report,
    run_command,
};

#[derive(Parser, Debug)]
#[command(name = "device-command")]
#[command(version)]
#[command(about = "Run one CLI command on a network device over SSH", long_about = None)]
struct Args {
    /// TextFSM template directory containing an `index` file; the built-in
    /// set is used when unset or unreadable
    #[arg(long, env = "NET_TEXTFSM")]
    templates: Option<PathBuf>,

    /// Seconds to wait for a command to return to the prompt
    #[arg(long, env = "SHERLOCK_READ_TIMEOUT", default_value_t = 60)]
    read_timeout: u64,

    /// Directory for the log file
    #[arg(long, env = "SHERLOCK_LOG_DIR", default_value = logging::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init("device_command", &args.log_dir, "info");

    report::emit(run(&args).await)
}

async fn run(args: &Args) -> sherlock::Result<CommandOutput> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    // The raw document carries credentials, so only the parsed shape is logged
    let request = CommandRequest::from_json(&raw)?;
    debug!(
        "request: {} ({}) command {:?}, use_textfsm={}",
        request.device.host, request.device.device_type, request.command, request.use_textfsm
    );

    let templates = match &args.templates {
        Some(dir) => TemplateIndex::load(dir).unwrap_or_else(|e| {
            warn!("templates unavailable, using the built-in set: {}", e);
            TemplateIndex::builtin()
        }),
        None => TemplateIndex::builtin(),
    };

    let options = RunnerOptions {
        read_timeout: Duration::from_secs(args.read_timeout),
        templates,
    };

    run_command(&SshConnector, request, &options).await
}
