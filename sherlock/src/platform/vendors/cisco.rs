//! Cisco IOS, IOS-XE and NX-OS platform definitions.
//!
//! Prompt patterns are adapted from [scrapli](https://github.com/carlmontanari/scrapli).
//!
//! # Prompt Examples
//!
//! ```text
//! access-sw01>                  # exec (IOS)
//! access-sw01#                  # privilege_exec
//! access-sw01(config)#          # configuration
//! access-sw01(config-if)#       # configuration sub-mode
//! core-nx01#                    # privilege_exec (NX-OS logs in here)
//! ```

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Platform name for Cisco IOS.
pub const IOS_PLATFORM_NAME: &str = "cisco_ios";

/// Platform name for Cisco IOS-XE, which shares the IOS definition.
pub const XE_PLATFORM_NAME: &str = "cisco_xe";

/// Platform name for Cisco NX-OS.
pub const NXOS_PLATFORM_NAME: &str = "cisco_nxos";

/// Cisco IOS (and IOS-XE) definition.
pub fn ios() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@/:]{1,63}>\s?$").unwrap();

    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@/:]{1,63}#\s?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(r"(?mi)^[Pp]assword:\s?$")
        .unwrap()
        .with_not_contains("(config");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@/:]{1,63}\((?:config[\w.\-@/:+]{0,32}|tcl)\)#\s?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_deescalate("end");

    PlatformDefinition::new(IOS_PLATFORM_NAME)
        .with_levels([exec, privilege_exec, configuration])
        .run_in("privilege_exec")
        .fails_on(&[
            "% Ambiguous command",
            "% Incomplete command",
            "% Invalid input detected",
            "% Unknown command",
        ])
        .on_open(&["terminal length 0", "terminal width 512"])
        .terminal(512, 24)
}

/// Cisco NX-OS definition.
pub fn nxos() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-]{1,63}>\s?$").unwrap();

    let privilege_exec = PrivilegeLevel::new(
        "privilege_exec",
        r"(?mi)^[\w.\-]{1,63}(?:\(maint-mode\))?#\s?$",
    )
    .unwrap()
    .with_parent("exec")
    .with_escalate("enable")
    .with_deescalate("disable")
    .with_auth(r"(?mi)^[Pp]assword:\s?$")
    .unwrap()
    .with_not_contains("(config");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-]{1,63}\(config[\w.\-@/:+]{0,32}\)#\s?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_deescalate("end");

    PlatformDefinition::new(NXOS_PLATFORM_NAME)
        .with_levels([exec, privilege_exec, configuration])
        .run_in("privilege_exec")
        .fails_on(&[
            "% Ambiguous command",
            "% Incomplete command",
            "% Invalid command",
            "% Invalid parameter detected",
            "% Permission denied",
        ])
        .on_open(&["terminal length 0", "terminal width 511"])
        .terminal(511, 24)
}
