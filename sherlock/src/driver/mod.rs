//! High-level driver for device interaction.
//!
//! The driver layer provides the main API for sending commands
//! and managing privilege levels on network devices.

mod builder;
mod generic;
mod privilege;
mod response;

pub use builder::{DEFAULT_READ_TIMEOUT, DriverBuilder};
pub use generic::GenericDriver;
pub use privilege::{PrivilegeManager, TransitionInfo};
pub use response::Response;

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Trait for device drivers.
///
/// This is the session seam the command runner works against; the SSH
/// implementation is [`GenericDriver`].
pub trait Driver: Send {
    /// Open the connection to the device.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    ///
    /// Closing a driver that is not open is a no-op.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt using the driver's timeout.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send {
        let timeout = self.timeout();
        self.send_command_timeout(command, timeout)
    }

    /// Send a command and wait up to `timeout` for the prompt.
    fn send_command_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Acquire a specific privilege level.
    fn acquire_privilege(&mut self, privilege: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;

    /// Default read timeout.
    fn timeout(&self) -> Duration;

    /// Name of the platform (`device_type`) this driver speaks.
    fn platform_name(&self) -> &str;

    /// Get the current privilege level name.
    fn current_privilege(&self) -> Option<&str>;
}
