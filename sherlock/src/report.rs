//! Translating results into the single stdout document.

use std::io::{self, Write};
use std::process::ExitCode;

use log::error;
use serde::Serialize;
use serde_json::json;

use crate::error::{Error, ErrorKind, Result};

/// Message shown to callers for timeouts of any kind.
pub const TIMEOUT_MESSAGE: &str = "Connection timed out";

/// Message shown to callers when the device rejects the credentials.
pub const AUTHENTICATION_MESSAGE: &str = "Authentication failed";

/// The caller-facing message for an error.
pub fn error_message(err: &Error) -> String {
    match err.kind() {
        ErrorKind::Timeout => TIMEOUT_MESSAGE.to_string(),
        ErrorKind::Authentication => AUTHENTICATION_MESSAGE.to_string(),
        ErrorKind::Validation | ErrorKind::MalformedInput | ErrorKind::Unexpected => err.to_string(),
    }
}

/// Render `result` as the response document and whether it is a success.
pub fn render<T: Serialize>(result: Result<T>) -> (String, bool) {
    match result.map(serde_json::to_value) {
        Ok(Ok(value)) => (value.to_string(), true),
        Ok(Err(e)) => {
            error!("failed to serialize result: {}", e);
            (json!({ "error": e.to_string() }).to_string(), false)
        }
        Err(err) => {
            error!("{:?} error: {}", err.kind(), err);
            (json!({ "error": error_message(&err) }).to_string(), false)
        }
    }
}

/// Write the response document to stdout and pick the exit status.
pub fn emit<T: Serialize>(result: Result<T>) -> ExitCode {
    emit_to(&mut io::stdout().lock(), result)
}

/// Write exactly one newline-terminated document to `writer`.
pub fn emit_to<W: Write, T: Serialize>(writer: &mut W, result: Result<T>) -> ExitCode {
    let (document, success) = render(result);

    if let Err(e) = writeln!(writer, "{}", document).and_then(|_| writer.flush()) {
        error!("failed to write result: {}", e);
        return ExitCode::FAILURE;
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
