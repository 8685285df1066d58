//! Global platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry.
static REGISTRY: Lazy<RwLock<PlatformRegistry>> = Lazy::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions, keyed by netmiko `device_type`.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    /// Look up a platform in the global registry and clone it.
    pub fn lookup(name: &str) -> Result<PlatformDefinition> {
        let registry = Self::global()
            .read()
            .map_err(|_| PlatformError::InvalidDefinition {
                message: "Failed to acquire registry lock".to_string(),
            })?;
        registry
            .get(name)
            .cloned()
            .ok_or_else(|| {
                PlatformError::UnknownPlatform {
                    name: name.to_string(),
                }
                .into()
            })
    }

    fn register_builtin_platforms(&mut self) {
        let ios = vendors::cisco::ios();
        self.insert(ios.alias(vendors::cisco::XE_PLATFORM_NAME));
        self.insert(ios);
        self.insert(vendors::cisco::nxos());
        self.insert(vendors::arista::platform());
    }

    fn insert(&mut self, platform: PlatformDefinition) {
        self.platforms.insert(platform.name.clone(), platform);
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }
}
