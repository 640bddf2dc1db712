use log::info;
use serde::Serialize;
use serde_json::Value;
use shared::app::AppContext;
use shared::models::node::{General, Hardware, Network, NodeSpec};
use shared::models::profile::Profile;

use crate::config::{int_field, require_min, str_field};
use crate::error::ScaleError;
use crate::plugin::ScalePlugin;
use crate::registry::PluginRegistry;

pub fn register(registry: &mut PluginRegistry) {
    registry.register("builtin", "1.0.0", || Box::new(BuiltinV1::default()));
    registry.register("builtin", "2.0.0", || Box::new(BuiltinV2::default()));
}

const DEFAULT_HOSTNAME_PREFIX: &str = "node";

/// Validated configuration for the builtin strategy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuiltinConfig {
    pub count: u32,
    pub containers: u32,
    pub containers_per_node: u32,
    pub hostname_prefix: String,
}

impl BuiltinConfig {
    pub fn from_profile(profile: &Profile) -> Result<Self, ScaleError> {
        Ok(Self {
            count: require_min("count", int_field(profile, "count", 1)?, 1)?,
            containers: require_min("containers", int_field(profile, "containers", 0)?, 0)?,
            containers_per_node: require_min(
                "containers_per_node",
                int_field(profile, "containers_per_node", 0)?,
                0,
            )?,
            hostname_prefix: str_field(profile, "hostname_prefix", DEFAULT_HOSTNAME_PREFIX)?,
        })
    }

    /// Container-partition mode: the node count is derived from the workload
    /// volume instead of being fixed.
    fn partitions_containers(&self) -> bool {
        self.containers > 0 && self.containers_per_node > 0
    }
}

/// The default strategy.
///
/// Deploys a fixed number of VMs (`count`), or derives the VM count from a
/// container volume and a per-node capacity (`containers`,
/// `containers_per_node`), assigning the remainder to the last node.
#[derive(Debug, Default)]
pub struct BuiltinV1 {
    config: Option<BuiltinConfig>,
}

impl ScalePlugin for BuiltinV1 {
    fn pre_configure(
        &mut self,
        _app: &dyn AppContext,
        profile: &Profile,
    ) -> Result<(), ScaleError> {
        self.config = Some(BuiltinConfig::from_profile(profile)?);
        Ok(())
    }

    fn pre_post_start(
        &mut self,
        _app: &dyn AppContext,
        profile: &Profile,
    ) -> Result<(), ScaleError> {
        self.config = Some(BuiltinConfig::from_profile(profile)?);
        Ok(())
    }

    fn get_node_count(&self) -> u32 {
        let Some(config) = &self.config else { return 0 };
        if config.partitions_containers() {
            config.containers.div_ceil(config.containers_per_node)
        } else {
            config.count
        }
    }

    fn get_hostname(&self, index: u32) -> String {
        let prefix = self
            .config
            .as_ref()
            .map_or(DEFAULT_HOSTNAME_PREFIX, |c| c.hostname_prefix.as_str());
        format!("{prefix}-{index}")
    }

    fn get_node_spec(&self, index: u32) -> NodeSpec {
        NodeSpec {
            node_type: "VirtualMachine".to_string(),
            general: General {
                hostname: self.get_hostname(index),
                vm_type: "kvm".to_string(),
            },
            hardware: Hardware::default(),
            network: Network::default(),
        }
    }

    fn get_container_count(&self, index: u32) -> u32 {
        let Some(config) = &self.config else { return 0 };
        if !config.partitions_containers() {
            return 0;
        }

        let nodes = self.get_node_count();
        if index == nodes {
            // The last node takes the remainder, which is a full share on an
            // exact fit.
            config.containers - (nodes - 1) * config.containers_per_node
        } else {
            config.containers_per_node
        }
    }

    fn get_plugin_config(&self) -> Value {
        self.config
            .as_ref()
            .and_then(|config| serde_json::to_value(config).ok())
            .unwrap_or(Value::Null)
    }
}

/// Version 2.0.0 of the builtin strategy.
///
/// Shares all validated state and partition math with [`BuiltinV1`] by
/// wrapping it; only the presentation differs. Its hostnames carry a `v2-`
/// marker and configuration logs a notice, which makes version resolution
/// observable end to end.
#[derive(Debug, Default)]
pub struct BuiltinV2 {
    inner: BuiltinV1,
}

impl ScalePlugin for BuiltinV2 {
    fn pre_configure(&mut self, app: &dyn AppContext, profile: &Profile) -> Result<(), ScaleError> {
        self.inner.pre_configure(app, profile)?;
        info!(
            "using builtin plugin v2.0.0 for profile '{}'",
            profile.name()
        );
        Ok(())
    }

    fn pre_post_start(
        &mut self,
        app: &dyn AppContext,
        profile: &Profile,
    ) -> Result<(), ScaleError> {
        self.inner.pre_post_start(app, profile)
    }

    fn get_node_count(&self) -> u32 {
        self.inner.get_node_count()
    }

    fn get_hostname(&self, index: u32) -> String {
        format!("v2-{}", self.inner.get_hostname(index))
    }

    fn get_node_spec(&self, index: u32) -> NodeSpec {
        let mut spec = self.inner.get_node_spec(index);
        spec.general.hostname = self.get_hostname(index);
        spec
    }

    fn get_container_count(&self, index: u32) -> u32 {
        self.inner.get_container_count(index)
    }

    fn get_plugin_config(&self) -> Value {
        self.inner.get_plugin_config()
    }
}
