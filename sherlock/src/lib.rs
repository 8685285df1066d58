//! # Sherlock
//!
//! Single-shot tools for network device inventory jobs.
//!
//! Each tool reads one JSON request from stdin and writes one JSON document
//! to stdout:
//!
//! - `device-command` opens an SSH session to a device, runs one command
//!   and returns the output, parsed into records with TextFSM templates
//!   when an index matches. Records from `show interface` gain an
//!   abbreviated `interface_short` name.
//! - `mac-lookup` resolves a MAC address to its vendor.
//!
//! The session layers (`transport`, `channel`, `platform`, `driver`) are
//! usable on their own:
//!
//! ```rust,no_run
//! use sherlock::{Driver, DriverBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sherlock::Error> {
//!     let mut driver = DriverBuilder::new("192.0.2.10")
//!         .username("netops")
//!         .password("secret")
//!         .platform("cisco_ios")
//!         .build()?;
//!
//!     driver.open().await?;
//!
//!     let response = driver.send_command("show version").await?;
//!     println!("{}", response.output);
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod device;
pub mod driver;
pub mod error;
pub mod interface;
pub mod logging;
pub mod platform;
pub mod report;
pub mod request;
pub mod runner;
pub mod structured;
pub mod transport;
pub mod vendor;

// Re-export main types for convenience
pub use device::DeviceDescriptor;
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use error::{Error, ErrorKind, Result};
pub use platform::{PlatformDefinition, PrivilegeLevel};
pub use request::{CommandRequest, VendorLookupRequest};
pub use runner::{Connector, RunnerOptions, SshConnector, run_command};
pub use structured::{CommandOutput, TemplateIndex};
pub use transport::{AuthMethod, SshConfig};
pub use vendor::{MacAddress, VendorLookupResult, VendorRepository};
