use std::collections::{BTreeMap, HashMap};

pub use shared::models::profile::LATEST_VERSION;

use crate::error::ScaleError;
use crate::plugin::ScalePlugin;

/// Zero-argument constructor for a strategy instance.
pub type PluginFactory = fn() -> Box<dyn ScalePlugin>;

/// Holds `name -> version -> factory` for every registered strategy.
///
/// The registry is an explicit object handed to registration code at
/// bootstrap; it is populated monotonically (there is no deletion path) and
/// provides no internal locking. Versions are kept in a `BTreeMap`, so
/// "latest" resolution falls out of plain lexicographic key order. That is
/// intentionally not semantic-version aware: "10.0.0" sorts before "2.0.0".
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, BTreeMap<String, PluginFactory>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every strategy compiled into this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::plugins::register_builtins(&mut registry);
        registry
    }

    /// Register a strategy factory. Re-registering an existing
    /// `(name, version)` pair silently replaces the previous entry; last
    /// registration wins.
    pub fn register(&mut self, name: &str, version: &str, factory: PluginFactory) {
        self.plugins
            .entry(name.to_string())
            .or_default()
            .insert(version.to_string(), factory);
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Whether `resolve(name, version)` would succeed.
    pub fn contains(&self, name: &str, version: &str) -> bool {
        match self.plugins.get(name) {
            Some(versions) => version == LATEST_VERSION || versions.contains_key(version),
            None => false,
        }
    }

    /// Instantiate a registered strategy. Every call produces a fresh
    /// instance; the registry never caches them.
    pub fn resolve(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn ScalePlugin>, ScaleError> {
        let versions = self
            .plugins
            .get(name)
            .ok_or_else(|| ScaleError::UnknownPlugin(name.to_string()))?;

        let factory = if version == LATEST_VERSION {
            versions.last_key_value().map(|(_, factory)| factory)
        } else {
            versions.get(version)
        };

        match factory {
            Some(factory) => Ok(factory()),
            None => Err(ScaleError::UnknownVersion {
                name: name.to_string(),
                version: version.to_string(),
            }),
        }
    }
}
