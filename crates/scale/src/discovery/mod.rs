//! Locates and registers strategy implementations by name.
//!
//! Discovery walks an ordered list of sources: the strategies compiled into
//! this crate first, then any externally supplied entry points. Sources are
//! best-effort; a source that fails to load is logged and skipped, and the
//! scan only fails once every source has been exhausted without producing a
//! registration for the requested name.

use log::{debug, warn};
use shared::models::profile::PluginRef;

use crate::error::ScaleError;
use crate::plugins;
use crate::registry::PluginRegistry;

/// One place a strategy implementation can be loaded from.
pub trait PluginSource {
    /// Short label used in log lines.
    fn describe(&self) -> &str;

    /// Attempt to register strategies matching `name`. `Ok(true)` means the
    /// source registered something for the name; `Ok(false)` means the
    /// source has nothing under that name.
    fn load(&self, name: &str, registry: &mut PluginRegistry) -> anyhow::Result<bool>;
}

/// Source backed by the strategy modules compiled into this crate.
#[derive(Debug, Default)]
pub struct BuiltinSource;

impl PluginSource for BuiltinSource {
    fn describe(&self) -> &str {
        "builtin"
    }

    fn load(&self, name: &str, registry: &mut PluginRegistry) -> anyhow::Result<bool> {
        match plugins::builtin_registrar(name) {
            Some(registrar) => {
                registrar(registry);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Make sure `plugin_ref` is registered, scanning `sources` in order when it
/// is not. Idempotent: an already-resolvable reference returns immediately
/// without touching any source, so repeated calls for the same profile are
/// safe.
///
/// A version mismatch is not discovery's concern; as long as some source
/// registered the name, resolution is left to the registry, which reports
/// `UnknownVersion` with more context.
pub fn ensure_registered(
    registry: &mut PluginRegistry,
    sources: &[Box<dyn PluginSource>],
    plugin_ref: &PluginRef,
) -> Result<(), ScaleError> {
    if registry.contains(&plugin_ref.name, &plugin_ref.version) {
        debug!("plugin '{}' is already registered", plugin_ref.name);
        return Ok(());
    }

    for source in sources {
        match source.load(&plugin_ref.name, registry) {
            Ok(true) => {
                if registry.contains(&plugin_ref.name, &plugin_ref.version) {
                    debug!(
                        "plugin '{}' registered from {} source",
                        plugin_ref.name,
                        source.describe()
                    );
                    return Ok(());
                }
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    "failed to load plugin '{}' from {} source: {e}",
                    plugin_ref.name,
                    source.describe()
                );
            }
        }
    }

    if registry.contains_name(&plugin_ref.name) {
        return Ok(());
    }

    Err(ScaleError::UnknownPlugin(plugin_ref.name.clone()))
}
