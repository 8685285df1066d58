//! Error types for sherlock.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for sherlock operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Invalid request documents
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Structured output (TextFSM) errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Post-processing of parsed records
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Vendor table errors
    #[error("Vendor table error: {0}")]
    Vendor(#[from] VendorError),

    /// Local I/O (reading the request)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// No platform registered under this name
    #[error("Unsupported device_type '{name}'")]
    UnknownPlatform { name: String },
}

/// Request document errors, raised before any remote work starts.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Standard input was not a JSON document
    #[error("Invalid JSON input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// A required field was missing, empty or of the wrong type
    #[error("{0}")]
    Validation(String),
}

/// TextFSM template lookup and parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The template index could not be read or understood
    #[error("template index {path}: {message}")]
    Index { path: String, message: String },

    /// A template file could not be read
    #[error("template {path}: {source}")]
    TemplateIo {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A template did not compile or failed on the output
    #[error("template {template}: {message}")]
    Template { template: String, message: String },
}

/// Errors while augmenting parsed records.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record lacks a field the post-processing needs
    #[error("Missing field '{field}' in parsed record")]
    MissingField { field: &'static str },
}

/// Vendor-prefix table errors.
#[derive(Error, Debug)]
pub enum VendorError {
    /// The manuf file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A line in the manuf file is malformed
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// The embedded OUI database failed to load
    #[error("embedded OUI database: {0}")]
    Embedded(String),
}

/// Coarse classification used when an error reaches the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or empty required field
    Validation,
    /// Input is not valid JSON
    MalformedInput,
    /// The device rejected the credentials
    Authentication,
    /// The device did not answer in time, or could not be reached
    Timeout,
    /// Everything else
    Unexpected,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Request(RequestError::MalformedInput(_)) => ErrorKind::MalformedInput,
            Error::Request(RequestError::Validation(_)) => ErrorKind::Validation,
            Error::Transport(TransportError::AuthenticationFailed { .. }) => {
                ErrorKind::Authentication
            }
            Error::Transport(TransportError::Timeout(_))
            | Error::Transport(TransportError::ConnectionFailed { .. })
            | Error::Transport(TransportError::Ssh(russh::Error::InactivityTimeout))
            | Error::Channel(ChannelError::PatternTimeout(_)) => ErrorKind::Timeout,
            _ => ErrorKind::Unexpected,
        }
    }

    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RequestError::Validation(message.into()).into()
    }
}

/// Result type alias using sherlock's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err: Error = TransportError::AuthenticationFailed {
            user: "admin".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let err: Error = ChannelError::PatternTimeout(Duration::from_secs(60)).into();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let err: Error = TransportError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let err: Error = TransportError::ConnectionFailed {
            host: "192.0.2.1".into(),
            port: 22,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let err = Error::validation("MAC address is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "MAC address is required");

        let err: Error = RecordError::MissingField { field: "interface" }.into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_malformed_input_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = RequestError::MalformedInput(source).into();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().starts_with("Invalid JSON input: "));
    }
}
