//! Per-`device_type` session settings.

use indexmap::IndexMap;

use super::privilege_level::PrivilegeLevel;
use crate::transport::TerminalSize;

/// What the driver needs to know to drive one kind of device CLI.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// The netmiko `device_type`, e.g. `cisco_ios`.
    pub name: String,

    /// Privilege levels, root first.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Level commands run in once the session is set up. Reached only
    /// when an enable secret is available.
    pub default_privilege: String,

    /// Output fragments the CLI prints when it rejects a command.
    pub failure_markers: Vec<String>,

    /// Sent right after login, before the requested command.
    pub session_setup: Vec<String>,

    pub terminal: TerminalSize,
}

impl PlatformDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            failure_markers: Vec::new(),
            session_setup: Vec::new(),
            terminal: TerminalSize::default(),
        }
    }

    /// Add privilege levels in order.
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = PrivilegeLevel>) -> Self {
        for level in levels {
            self.privilege_levels.insert(level.name.clone(), level);
        }
        self
    }

    pub fn run_in(mut self, level: impl Into<String>) -> Self {
        self.default_privilege = level.into();
        self
    }

    pub fn fails_on(mut self, markers: &[&str]) -> Self {
        self.failure_markers
            .extend(markers.iter().map(|m| m.to_string()));
        self
    }

    pub fn on_open(mut self, commands: &[&str]) -> Self {
        self.session_setup
            .extend(commands.iter().map(|c| c.to_string()));
        self
    }

    pub fn terminal(mut self, width: u32, height: u32) -> Self {
        self.terminal = TerminalSize { width, height };
        self
    }

    /// The same definition under another `device_type`.
    pub fn alias(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn level(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(name)
    }

    /// First failure marker present in `output`.
    pub fn failure_in(&self, output: &str) -> Option<&str> {
        self.failure_markers
            .iter()
            .map(String::as_str)
            .find(|marker| output.contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab() -> PlatformDefinition {
        PlatformDefinition::new("lab_os")
            .with_levels([
                PrivilegeLevel::new("user", r"(?m)^\S+>\s?$").unwrap(),
                PrivilegeLevel::new("admin", r"(?m)^\S+#\s?$")
                    .unwrap()
                    .with_parent("user"),
            ])
            .run_in("admin")
            .fails_on(&["% Bad command", "% Incomplete"])
            .on_open(&["no paging"])
            .terminal(200, 50)
    }

    #[test]
    fn test_levels_keep_insertion_order() {
        let platform = lab();
        assert_eq!(
            platform.privilege_levels.keys().collect::<Vec<_>>(),
            ["user", "admin"]
        );
        assert_eq!(platform.level("admin").unwrap().previous_priv.as_deref(), Some("user"));
        assert!(platform.level("configuration").is_none());
    }

    #[test]
    fn test_failure_in() {
        let platform = lab();
        assert_eq!(
            platform.failure_in("show foo\n% Bad command at '^'"),
            Some("% Bad command")
        );
        assert_eq!(platform.failure_in("all good"), None);
    }

    #[test]
    fn test_alias_keeps_everything_else() {
        let alias = lab().alias("lab_os_v2");
        assert_eq!(alias.name, "lab_os_v2");
        assert_eq!(alias.session_setup, ["no paging"]);
        assert_eq!(alias.terminal, TerminalSize { width: 200, height: 50 });
    }
}
