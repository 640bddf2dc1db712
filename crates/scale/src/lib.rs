mod config;
mod discovery;
mod error;
mod plugin;
pub mod plugins;
mod registry;

pub use discovery::ensure_registered;
pub use discovery::BuiltinSource;
pub use discovery::PluginSource;
pub use error::ScaleError;
pub use plugin::ScalePlugin;
pub use plugins::builtin::BuiltinConfig;
pub use plugins::builtin::BuiltinV1;
pub use plugins::builtin::BuiltinV2;
pub use plugins::wind_turbine::WindTurbine;
pub use plugins::wind_turbine::WindTurbineConfig;
pub use registry::PluginFactory;
pub use registry::PluginRegistry;
pub use registry::LATEST_VERSION;
