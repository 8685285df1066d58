//! Outcome of one command.

use std::fmt;
use std::time::Duration;

/// Cleaned output of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub command: String,

    /// Output with the command echo and the trailing prompt removed.
    pub output: String,

    /// Time from sending the command to seeing the prompt again.
    pub elapsed: Duration,

    /// Platform failure marker found in the output, if any. The device
    /// still answered, so the output is kept.
    pub failure: Option<String>,
}

impl Response {
    pub fn new(command: impl Into<String>, output: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            elapsed,
            failure: None,
        }
    }

    pub fn with_failure(mut self, marker: impl Into<String>) -> Self {
        self.failure = Some(marker.into());
        self
    }

    /// Consume the response, keeping only the output.
    pub fn into_output(self) -> String {
        self.output
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
