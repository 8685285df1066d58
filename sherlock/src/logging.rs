//! Process logging for the command line tools.
//!
//! Records go to stderr and to `<log-dir>/<tool>.log`; stdout is reserved
//! for the response document.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};
use log::warn;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Writes every record to stderr and, when available, a log file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Path of the log file for `tool` inside `log_dir`.
pub fn log_file_path(log_dir: &Path, tool: &str) -> PathBuf {
    log_dir.join(format!("{}.log", tool))
}

fn open_log_file(log_dir: &Path, tool: &str) -> io::Result<File> {
    fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(log_dir, tool))
}

/// Install the global logger. `RUST_LOG` overrides `default_filter`.
///
/// If the log file cannot be opened, logging continues on stderr only.
pub fn init(tool: &str, log_dir: &Path, default_filter: &str) {
    let (file, file_error) = match open_log_file(log_dir, tool) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };

    let initialized = Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .is_ok();

    if let (true, Some(e)) = (initialized, file_error) {
        warn!(
            "cannot write log file in {}: {}; logging to stderr only",
            log_dir.display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_created_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        let mut file = open_log_file(&log_dir, "device_command").unwrap();
        file.write_all(b"line\n").unwrap();

        let path = log_file_path(&log_dir, "device_command");
        assert_eq!(path, log_dir.join("device_command.log"));
        assert_eq!(fs::read_to_string(path).unwrap(), "line\n");
    }

    #[test]
    fn test_tee_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut tee = Tee {
            file: Some(open_log_file(dir.path(), "mac_lookup").unwrap()),
        };
        tee.write_all(b"first\n").unwrap();
        tee.flush().unwrap();
        drop(tee);

        let mut tee = Tee {
            file: Some(open_log_file(dir.path(), "mac_lookup").unwrap()),
        };
        tee.write_all(b"second\n").unwrap();
        drop(tee);

        let contents = fs::read_to_string(log_file_path(dir.path(), "mac_lookup")).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_tee_without_file() {
        let mut tee = Tee { file: None };
        assert_eq!(tee.write(b"stderr only\n").unwrap(), 12);
    }
}
