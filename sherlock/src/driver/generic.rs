//! Generic driver implementation that works with any platform.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::Driver;
use super::privilege::PrivilegeManager;
use super::response::Response;
use crate::channel::{PtyChannel, combine_prompt_patterns, last_line};
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::{self, PlatformDefinition};
use crate::transport::{SshConfig, SshTransport};

/// An established SSH connection with its interactive shell.
struct Session {
    transport: SshTransport,
    channel: PtyChannel,
}

/// Generic driver that works with any platform definition.
///
/// This is the main driver implementation that handles:
/// - SSH transport management
/// - Command execution with prompt detection
/// - Privilege level navigation
/// - Output clean-up and failure marker detection
pub struct GenericDriver {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Platform definition.
    platform: PlatformDefinition,

    /// Live session (None when disconnected).
    session: Option<Session>,

    /// Privilege level manager.
    privilege_manager: PrivilegeManager,

    /// Default read timeout for commands.
    timeout: Duration,

    /// Combined prompt pattern for all privilege levels.
    prompt_pattern: Regex,

    /// Password for privilege escalation (`enable`).
    enable_secret: Option<SecretString>,

    /// Tail search depth for prompt detection.
    search_depth: usize,
}

impl GenericDriver {
    /// Create a new generic driver. Nothing is connected until `open()`.
    pub fn new(
        ssh_config: SshConfig,
        platform: PlatformDefinition,
        timeout: Duration,
        enable_secret: Option<SecretString>,
    ) -> Result<Self> {
        let privilege_manager = PrivilegeManager::new(platform.privilege_levels.clone());

        let prompt_pattern = combine_prompt_patterns(
            platform
                .privilege_levels
                .values()
                .map(|level| level.pattern.as_str()),
        )
        .map_err(ChannelError::InvalidPattern)?;

        Ok(Self {
            ssh_config,
            platform,
            session: None,
            privilege_manager,
            timeout,
            prompt_pattern,
            enable_secret,
            search_depth: 1000,
        })
    }

    /// Get the current prompt pattern.
    pub fn prompt_pattern(&self) -> &Regex {
        &self.prompt_pattern
    }

    /// Wait for the login prompt, escalate if configured, disable paging.
    async fn prepare_session(&mut self) -> Result<()> {
        let timeout = self.timeout;
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        let data = session
            .channel
            .read_until_pattern(&self.prompt_pattern, timeout)
            .await?;

        let prompt = last_line(&data);
        let level = self.privilege_manager.observe_prompt(&prompt);
        debug!("initial prompt {:?} (privilege {:?})", prompt, level);

        let target = self.platform.default_privilege.clone();
        if self.enable_secret.is_some()
            && !target.is_empty()
            && self.current_privilege() != Some(target.as_str())
        {
            self.acquire_privilege(&target).await?;
        }

        for command in self.platform.session_setup.clone() {
            self.send_command_timeout(&command, timeout).await?;
        }

        Ok(())
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        info!(
            "opening {} session to {}",
            self.platform.name,
            self.ssh_config.socket_addr()
        );

        let transport = SshTransport::connect(&self.ssh_config).await?;
        let channel = match transport.open_channel(self.search_depth).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    warn!("failed to disconnect after channel error: {}", close_err);
                }
                return Err(e);
            }
        };
        self.session = Some(Session { transport, channel });

        if let Err(e) = self.prepare_session().await {
            if let Err(close_err) = self.close().await {
                warn!("failed to close session after setup error: {}", close_err);
            }
            return Err(e);
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            debug!("closing session to {}", self.ssh_config.socket_addr());
            if let Err(e) = session.channel.close().await {
                debug!("channel close: {}", e);
            }
            session.transport.close().await?;
        }
        Ok(())
    }

    async fn send_command_timeout(&mut self, command: &str, timeout: Duration) -> Result<Response> {
        let start = Instant::now();

        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        session.channel.send(command).await?;
        let data = session
            .channel
            .read_until_pattern(&self.prompt_pattern, timeout)
            .await?;

        let elapsed = start.elapsed();
        self.privilege_manager.observe_prompt(&last_line(&data));

        let output = platform::normalize_output(&String::from_utf8_lossy(&data), command);
        debug!(
            "{:?} returned {} bytes in {:?}",
            command,
            output.len(),
            elapsed
        );

        let failure = self.platform.failure_in(&output).map(str::to_string);
        let response = Response::new(command, output, elapsed);
        Ok(match failure {
            Some(marker) => response.with_failure(marker),
            None => response,
        })
    }

    async fn acquire_privilege(&mut self, target: &str) -> Result<()> {
        let steps = self.privilege_manager.plan(target)?;
        let timeout = self.timeout;

        for step in steps {
            debug!("privilege: sending {:?} for {}", step.command, step.target);

            let wait_for = match &step.auth_prompt {
                Some(auth) => combine_prompt_patterns([auth.as_str(), self.prompt_pattern.as_str()])
                    .map_err(ChannelError::InvalidPattern)?,
                None => self.prompt_pattern.clone(),
            };

            let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
            session.channel.send(&step.command).await?;
            let mut data = session.channel.read_until_pattern(&wait_for, timeout).await?;

            if let Some(auth) = &step.auth_prompt {
                if auth.is_match(last_line(&data).as_bytes()) {
                    let secret = self
                        .enable_secret
                        .as_ref()
                        .map(|s| s.expose_secret().to_string())
                        .unwrap_or_default();
                    session.channel.send(&secret).await?;
                    data = session
                        .channel
                        .read_until_pattern(&self.prompt_pattern, timeout)
                        .await?;
                }
            }

            let prompt = last_line(&data);
            if self.privilege_manager.observe_prompt(&prompt) != Some(step.target.as_str()) {
                return Err(DriverError::PrivilegeAcquisitionFailed {
                    target: step.target,
                }
                .into());
            }
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.transport.is_closed())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn platform_name(&self) -> &str {
        &self.platform.name
    }

    fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current().map(|level| level.name.as_str())
    }
}

impl Drop for GenericDriver {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!(
                "driver for {} dropped without close()",
                self.ssh_config.socket_addr()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::vendors::cisco;
    use crate::transport::{AuthMethod, HostKeyPolicy, HostKeyVerification};

    fn driver() -> GenericDriver {
        let platform = cisco::ios();
        let config = SshConfig {
            host: "192.0.2.10".into(),
            port: 22,
            username: "netops".into(),
            auth: AuthMethod::None,
            connect_timeout: Duration::from_secs(5),
            inactivity_timeout: Duration::from_secs(60),
            terminal: platform.terminal,
            host_keys: HostKeyPolicy {
                verification: HostKeyVerification::Disabled,
                known_hosts: None,
            },
        };
        GenericDriver::new(config, platform, Duration::from_secs(60), None).unwrap()
    }

    #[test]
    fn test_combined_prompt_pattern() {
        let driver = driver();
        let pattern = driver.prompt_pattern();
        assert!(pattern.is_match(b"access-sw01>"));
        assert!(pattern.is_match(b"output\r\naccess-sw01#"));
        assert!(pattern.is_match(b"access-sw01(config-if)#"));
    }

    #[test]
    fn test_not_open_until_opened() {
        let driver = driver();
        assert!(!driver.is_open());
        assert_eq!(driver.platform_name(), "cisco_ios");
        assert_eq!(driver.current_privilege(), None);
    }

    #[test]
    fn test_send_command_requires_open() {
        let mut driver = driver();
        let err = tokio_test::block_on(driver.send_command("show version")).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Driver(DriverError::NotConnected)
        ));
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut driver = driver();
        assert!(tokio_test::block_on(driver.close()).is_ok());
    }
}
