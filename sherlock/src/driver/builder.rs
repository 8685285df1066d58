//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::error::{DriverError, Result};
use crate::platform::PlatformRegistry;
use crate::transport::{AuthMethod, HostKeyPolicy, HostKeyVerification, SshConfig};

/// Default read timeout for a single command.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use sherlock::driver::{Driver, DriverBuilder};
///
/// # async fn example() -> Result<(), sherlock::Error> {
/// let mut driver = DriverBuilder::new("192.0.2.10")
///     .username("netops")
///     .password("secret")
///     .platform("cisco_ios")
///     .build()?;
/// driver.open().await?;
/// let response = driver.send_command("show version").await?;
/// println!("{}", response.output);
/// driver.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    enable_secret: Option<SecretString>,
    platform_name: Option<String>,
    timeout: Duration,
    read_timeout: Duration,
    host_keys: HostKeyPolicy,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            enable_secret: None,
            platform_name: None,
            timeout: Duration::from_secs(30),
            read_timeout: DEFAULT_READ_TIMEOUT,
            host_keys: HostKeyPolicy::default(),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set any authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    /// Set the secret sent when escalating privilege (`enable`).
    ///
    /// With a secret set, `open()` escalates to the platform's default
    /// privilege level.
    pub fn enable_secret(mut self, secret: SecretString) -> Self {
        self.enable_secret = Some(secret);
        self
    }

    /// Set the platform name (e.g., "cisco_ios", "cisco_nxos").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default read timeout for commands.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_keys.verification = mode;
        self
    }

    /// Check host keys against this file instead of `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.host_keys.known_hosts = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "username is required".to_string(),
        })?;

        let name = self.platform_name.ok_or_else(|| DriverError::InvalidConfig {
            message: "device_type is required".to_string(),
        })?;
        let platform = PlatformRegistry::lookup(&name)?;

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            connect_timeout: self.timeout,
            inactivity_timeout: self.timeout.max(self.read_timeout),
            terminal: platform.terminal,
            host_keys: self.host_keys,
        };

        GenericDriver::new(ssh_config, platform, self.read_timeout, self.enable_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;

    #[test]
    fn test_build_registered_platform() {
        let driver = DriverBuilder::new("192.0.2.10")
            .username("netops")
            .password("secret")
            .platform("cisco_nxos")
            .build()
            .unwrap();
        assert_eq!(driver.platform_name(), "cisco_nxos");
        assert_eq!(driver.timeout(), DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_build_requires_username() {
        let err = DriverBuilder::new("192.0.2.10")
            .platform("cisco_ios")
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("username is required"));
    }

    #[test]
    fn test_build_unknown_platform() {
        let err = DriverBuilder::new("192.0.2.10")
            .username("netops")
            .platform("cisco_asa")
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported device_type 'cisco_asa'"));
    }
}
