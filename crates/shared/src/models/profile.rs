use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LATEST_VERSION: &str = "latest";

const DEFAULT_PLUGIN: &str = "builtin";

/// One scaling request as supplied by the orchestrator's metadata document.
///
/// Profiles are free-form mappings: each strategy reads the keys it
/// understands and ignores the rest. A profile is immutable once handed to a
/// strategy instance and is never shared across strategy instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile(pub Map<String, Value>);

impl Profile {
    pub fn name(&self) -> &str {
        self.0
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The strategy reference carried by the profile: either a bare name or
    /// a `{name, version}` mapping. A missing version means "latest"; a
    /// missing reference falls back to the builtin strategy.
    pub fn plugin_ref(&self) -> PluginRef {
        match self.0.get("plugin") {
            Some(Value::String(name)) => PluginRef {
                name: name.clone(),
                version: LATEST_VERSION.to_string(),
            },
            Some(Value::Object(map)) => PluginRef {
                name: map
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PLUGIN)
                    .to_string(),
                version: map
                    .get("version")
                    .and_then(Value::as_str)
                    .unwrap_or(LATEST_VERSION)
                    .to_string(),
            },
            _ => PluginRef::latest(DEFAULT_PLUGIN),
        }
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A named, optionally versioned reference to a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginRef {
    pub name: String,
    pub version: String,
}

impl PluginRef {
    pub fn latest(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: LATEST_VERSION.to_string(),
        }
    }

    pub fn is_latest(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(value: Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plugin_ref_from_bare_name() {
        let profile = profile(serde_json::json!({"plugin": "wind_turbine"}));
        assert_eq!(profile.plugin_ref(), PluginRef::latest("wind_turbine"));
    }

    #[test]
    fn test_plugin_ref_from_mapping() {
        let profile = profile(serde_json::json!({
            "plugin": {"name": "builtin", "version": "2.0.0"}
        }));
        let plugin_ref = profile.plugin_ref();
        assert_eq!(plugin_ref.name, "builtin");
        assert_eq!(plugin_ref.version, "2.0.0");
        assert!(!plugin_ref.is_latest());
    }

    #[test]
    fn test_plugin_ref_version_defaults_to_latest() {
        let profile = profile(serde_json::json!({"plugin": {"name": "wind_turbine"}}));
        assert_eq!(profile.plugin_ref(), PluginRef::latest("wind_turbine"));
    }

    #[test]
    fn test_plugin_ref_defaults_to_builtin() {
        let profile = profile(serde_json::json!({"name": "no-plugin-key"}));
        assert_eq!(profile.plugin_ref(), PluginRef::latest("builtin"));
        assert_eq!(profile.name(), "no-plugin-key");
    }
}
