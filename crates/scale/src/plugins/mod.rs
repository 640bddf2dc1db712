use crate::registry::PluginRegistry;

pub mod builtin;
pub mod wind_turbine;

/// Registration hook exposed by every strategy module. Registration is an
/// explicit call made at bootstrap or by discovery, not a hidden side effect
/// of loading code.
pub type Registrar = fn(&mut PluginRegistry);

/// Strategies compiled into this crate, keyed by their registry name.
const BUILTIN_REGISTRARS: &[(&str, Registrar)] = &[
    ("builtin", builtin::register),
    ("wind_turbine", wind_turbine::register),
];

pub(crate) fn builtin_registrar(name: &str) -> Option<Registrar> {
    BUILTIN_REGISTRARS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, registrar)| *registrar)
}

/// Register every compiled-in strategy.
pub(crate) fn register_builtins(registry: &mut PluginRegistry) {
    for (_, registrar) in BUILTIN_REGISTRARS {
        registrar(registry);
    }
}
