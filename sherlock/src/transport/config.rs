//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// How the server's host key is checked against known_hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Unknown and changed keys are both rejected.
    Strict,

    /// Unknown keys are recorded, changed keys are rejected.
    #[default]
    AcceptNew,

    /// No check at all.
    Disabled,
}

/// Host key checking mode plus the known_hosts file it works on.
#[derive(Debug, Clone, Default)]
pub struct HostKeyPolicy {
    pub verification: HostKeyVerification,

    /// Alternate known_hosts file; `~/.ssh/known_hosts` when unset.
    pub known_hosts: Option<PathBuf>,
}

/// PTY dimensions requested for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u32,
    pub height: u32,
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self {
            width: 511,
            height: 24,
        }
    }
}

/// Everything needed to reach and log in to one device.
#[derive(Debug)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,

    /// Deadline for TCP connect, handshake and authentication.
    pub connect_timeout: Duration,

    /// Idle time after which russh drops the session. Must outlast the
    /// slowest command.
    pub inactivity_timeout: Duration,

    pub terminal: TerminalSize,
    pub host_keys: HostKeyPolicy,
}

impl SshConfig {
    /// `host:port`, for logs and errors.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credentials offered to the server.
#[derive(Debug)]
pub enum AuthMethod {
    /// `none` authentication; only lab devices accept it.
    None,

    Password(SecretString),

    PrivateKey {
        path: PathBuf,
        /// Passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

impl AuthMethod {
    /// Method name as it appears in the SSH protocol.
    pub fn method_name(&self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::Password(_) => "password",
            AuthMethod::PrivateKey { .. } => "publickey",
        }
    }
}
