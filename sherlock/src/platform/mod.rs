//! Platform definitions for multi-vendor support.
//!
//! A platform bundles the prompt patterns, privilege levels, paging
//! commands and failure markers for one netmiko `device_type`.

mod definition;
mod privilege_level;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use privilege_level::PrivilegeLevel;
pub use registry::PlatformRegistry;

/// Strip the command echo and the trailing prompt from raw shell output.
///
/// The supported CLIs all echo the command on the first line and end with
/// the prompt on the last.
pub fn normalize_output(raw: &str, command: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = text.lines().collect();

    if lines
        .first()
        .is_some_and(|line| line.trim_end().ends_with(command.trim()))
    {
        lines.remove(0);
    }
    lines.pop();

    lines.join("\n")
}
