//! Device connection descriptors.
//!
//! The `device` object of a command request uses netmiko's
//! `ConnectHandler` keyword names so existing callers can send the same
//! document they always have.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::driver::{DriverBuilder, GenericDriver};
use crate::error::Result;
use crate::transport::{AuthMethod, HostKeyPolicy, HostKeyVerification};

/// Default TCP/SSH connection timeout (netmiko's `conn_timeout`).
pub const DEFAULT_CONN_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection parameters for one device.
#[derive(Debug, Deserialize)]
pub struct DeviceDescriptor {
    /// Platform identifier, e.g. `cisco_ios` or `cisco_nxos`.
    pub device_type: String,

    /// Hostname or address.
    #[serde(alias = "ip")]
    pub host: String,

    pub username: String,

    #[serde(default, deserialize_with = "optional_secret")]
    pub password: Option<SecretString>,

    /// Enable secret.
    #[serde(default, deserialize_with = "optional_secret")]
    pub secret: Option<SecretString>,

    #[serde(default, deserialize_with = "optional_port")]
    pub port: Option<u16>,

    /// Private key used instead of the password when present.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    #[serde(default, deserialize_with = "optional_secret")]
    pub passphrase: Option<SecretString>,

    /// Connection timeout in seconds.
    #[serde(default)]
    pub conn_timeout: Option<f64>,

    /// Reject hosts that are missing from or changed in known_hosts.
    #[serde(default)]
    pub ssh_strict: bool,

    /// Check (and learn) host keys against the user's known_hosts.
    #[serde(default)]
    pub system_host_keys: bool,

    /// Use `alt_key_file` as the known_hosts file.
    #[serde(default)]
    pub alt_host_keys: bool,

    #[serde(default)]
    pub alt_key_file: Option<PathBuf>,

    /// Keys this tool does not use; accepted so callers need not filter.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceDescriptor {
    /// Build an unopened driver for this device.
    pub fn into_driver(self, read_timeout: Duration) -> Result<GenericDriver> {
        if !self.extra.is_empty() {
            debug!(
                "ignoring device keys: {:?}",
                self.extra.keys().collect::<Vec<_>>()
            );
        }

        let timeout = self
            .conn_timeout
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(DEFAULT_CONN_TIMEOUT);

        let host_keys = self.host_key_policy();

        let auth = match (self.key_file, self.password) {
            (Some(path), _) => AuthMethod::PrivateKey {
                path,
                passphrase: self.passphrase,
            },
            (None, Some(password)) => AuthMethod::Password(password),
            (None, None) => AuthMethod::None,
        };

        let mut builder = DriverBuilder::new(self.host)
            .port(self.port.unwrap_or(22))
            .username(self.username)
            .auth(auth)
            .platform(self.device_type)
            .timeout(timeout)
            .read_timeout(read_timeout)
            .host_key_verification(host_keys.verification);

        if let Some(path) = host_keys.known_hosts {
            builder = builder.known_hosts_path(path);
        }
        if let Some(secret) = self.secret {
            builder = builder.enable_secret(secret);
        }

        builder.build()
    }

    /// Host key checking from netmiko's `ssh_strict`, `system_host_keys`
    /// and `alt_host_keys`/`alt_key_file` flags.
    ///
    /// `system_host_keys` alone matches the default: unknown hosts are
    /// learned, changed keys rejected.
    pub fn host_key_policy(&self) -> HostKeyPolicy {
        let verification = if self.ssh_strict {
            HostKeyVerification::Strict
        } else if self.system_host_keys {
            HostKeyVerification::AcceptNew
        } else {
            HostKeyVerification::default()
        };

        let known_hosts = self
            .alt_key_file
            .clone()
            .filter(|path| self.alt_host_keys && !path.as_os_str().is_empty());

        HostKeyPolicy {
            verification,
            known_hosts,
        }
    }
}

/// Strings become secrets; absent, null and empty values become `None`.
fn optional_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .map(SecretString::from))
}

/// Ports arrive as numbers or numeric strings depending on the caller.
fn optional_port<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Number(port)) => Ok(Some(port)),
        Some(Port::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{}'", text))),
    }
}
