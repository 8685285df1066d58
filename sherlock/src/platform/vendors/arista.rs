//! Arista EOS platform definition.
//!
//! ```text
//! leaf01>                    # exec
//! leaf01#                    # privilege_exec
//! leaf01(config-if-Et1)#     # configuration
//! ```

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Platform name for Arista EOS.
pub const PLATFORM_NAME: &str = "arista_eos";

/// Create the Arista EOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@()/: ]{1,63}>\s?$").unwrap();

    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@()/: ]{1,63}#\s?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(r"(?mi)^password:\s?$")
        .unwrap()
        .with_not_contains("(config");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@()/: ]{1,63}\(config[\w.\-@/:+]{0,63}\)#\s?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_deescalate("end");

    PlatformDefinition::new(PLATFORM_NAME)
        .with_levels([exec, privilege_exec, configuration])
        .run_in("privilege_exec")
        .fails_on(&[
            "% Ambiguous command",
            "% Incomplete command",
            "% Invalid input",
            "% Unavailable command",
        ])
        .on_open(&["terminal length 0", "terminal width 32767"])
        .terminal(32767, 24)
}
