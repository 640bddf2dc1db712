use std::net::Ipv4Addr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::app::AppContext;
use shared::models::node::{ContainerDetail, General, Hardware, Interface, Network, NodeSpec};
use shared::models::profile::Profile;

use crate::config::{int_field, require_min, section, str_field};
use crate::error::ScaleError;
use crate::plugin::ScalePlugin;
use crate::registry::PluginRegistry;

#[cfg(test)]
mod tests;

pub fn register(registry: &mut PluginRegistry) {
    registry.register("wind_turbine", "1.0.0", || Box::new(WindTurbine::default()));
}

const DEFAULT_VCPUS: u32 = 8;
const DEFAULT_MEMORY_MB: u32 = 16384;
const DEFAULT_IMAGE: &str = "wind-turbine.qc2";

/// Container roles replicated on every turbine node. Unlike the builtin
/// strategy the workload is not divided across nodes; each node runs the
/// full set.
const CONTAINER_ROLES: &[&str] = &[
    "main-controller",
    "yaw-controller",
    "blade-pitch-1",
    "blade-pitch-2",
    "blade-pitch-3",
    "anemometer",
];

/// Per-profile overrides layered over the strategy's hardware defaults.
/// Overrides replace the corresponding default wholesale; the interface list
/// in particular is replaced as a whole, never merged per element.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeTemplate {
    pub cpu: Option<u32>,
    pub memory: Option<u32>,
    pub image: Option<String>,
    pub network: Option<NetworkTemplate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkTemplate {
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContainerTemplate {
    pub external_network: Option<ExternalNetwork>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalNetwork {
    pub name: String,
    /// CIDR the workload endpoints draw their addresses from.
    pub network: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated configuration for the wind turbine strategy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WindTurbineConfig {
    pub name: String,
    pub count: u32,
    pub node_template: NodeTemplate,
    pub container_template: ContainerTemplate,
}

impl WindTurbineConfig {
    pub fn from_profile(profile: &Profile) -> Result<Self, ScaleError> {
        let name = str_field(profile, "name", "unknown")?;
        let count = require_min("count", int_field(profile, "count", 1)?, 1)?;
        let node_template: NodeTemplate = section(profile, "node_template")?;
        let container_template: ContainerTemplate = section(profile, "container_template")?;

        if count > 0 && container_template.external_network.is_none() {
            return Err(ScaleError::config(
                "container_template.external_network must be defined when count > 0",
            ));
        }

        Ok(Self {
            name,
            count,
            node_template,
            container_template,
        })
    }
}

/// Scales a farm of wind turbine nodes.
///
/// Every node gets the same hardware baseline (overridable per profile
/// through `node_template`) and the same fixed set of controller containers,
/// whose external endpoints draw sequential addresses from the profile's
/// external network CIDR.
#[derive(Debug, Default)]
pub struct WindTurbine {
    config: Option<WindTurbineConfig>,
}

impl WindTurbine {
    fn config(&self) -> Result<&WindTurbineConfig, ScaleError> {
        self.config
            .as_ref()
            .ok_or_else(|| ScaleError::config("wind_turbine plugin is not configured"))
    }
}

impl ScalePlugin for WindTurbine {
    fn validate_profile(&self, profile: &Profile) -> Result<(), ScaleError> {
        WindTurbineConfig::from_profile(profile).map(|_| ())
    }

    fn pre_configure(
        &mut self,
        _app: &dyn AppContext,
        profile: &Profile,
    ) -> Result<(), ScaleError> {
        self.config = Some(WindTurbineConfig::from_profile(profile)?);
        Ok(())
    }

    fn pre_post_start(
        &mut self,
        _app: &dyn AppContext,
        profile: &Profile,
    ) -> Result<(), ScaleError> {
        self.config = Some(WindTurbineConfig::from_profile(profile)?);
        Ok(())
    }

    fn get_node_count(&self) -> u32 {
        self.config.as_ref().map_or(0, |config| config.count)
    }

    fn get_hostname(&self, index: u32) -> String {
        let name = self.config.as_ref().map_or("unknown", |c| c.name.as_str());
        format!("{name}-{index}")
    }

    fn get_node_spec(&self, index: u32) -> NodeSpec {
        let template = self
            .config
            .as_ref()
            .map(|config| config.node_template.clone())
            .unwrap_or_default();

        let interfaces = template
            .network
            .map(|network| network.interfaces)
            .unwrap_or_default();

        NodeSpec {
            node_type: "VirtualMachine".to_string(),
            general: General {
                hostname: self.get_hostname(index),
                vm_type: "kvm".to_string(),
            },
            hardware: Hardware {
                vcpus: Some(template.cpu.unwrap_or(DEFAULT_VCPUS)),
                memory: Some(template.memory.unwrap_or(DEFAULT_MEMORY_MB)),
                image: Some(template.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string())),
            },
            network: Network { interfaces },
        }
    }

    fn on_node_configured(
        &mut self,
        _app: &dyn AppContext,
        index: u32,
        hostname: &str,
    ) -> Result<(), ScaleError> {
        debug!("turbine node {index} ('{hostname}') added to topology");
        Ok(())
    }

    fn get_additional_startup_commands(&self, _index: u32, hostname: &str) -> String {
        format!("wind-turbine-init --hostname {hostname}\n")
    }

    fn get_container_count(&self, _index: u32) -> u32 {
        if self.config.is_some() {
            CONTAINER_ROLES.len() as u32
        } else {
            0
        }
    }

    fn get_container_details(
        &self,
        app: &dyn AppContext,
        index: u32,
    ) -> Result<Vec<ContainerDetail>, ScaleError> {
        let config = self.config()?;
        let external = config
            .container_template
            .external_network
            .as_ref()
            .ok_or_else(|| {
                ScaleError::config("container_template.external_network must be defined")
            })?;

        let network_desc = serde_json::to_value(external)
            .map_err(|e| ScaleError::config(format!("invalid external_network: {e}")))?;
        let (network_id, infos) = app
            .process_networks(&network_desc)
            .map_err(|e| ScaleError::config(format!("failed to process external network: {e}")))?;

        let cidr = external.network.as_deref().ok_or_else(|| {
            ScaleError::config("external_network.network (CIDR) is required for addressing")
        })?;
        let (base, cidr_prefix, has_host_bits) = parse_cidr(cidr)?;
        let prefix = infos.first().map_or(cidr_prefix, |info| info.prefix);
        let gateway = app.get_gateway(&network_id);

        // A network base address means "start at the first usable host
        // address"; a specific host address means "start exactly there".
        // Each node/role pair consumes the next sequential address within
        // the prefix; running past the host range is not handled here.
        let start = if has_host_bits { base } else { base + 1 };
        let node_offset = (index - 1) * CONTAINER_ROLES.len() as u32;

        let details = CONTAINER_ROLES
            .iter()
            .enumerate()
            .map(|(slot, role)| {
                let address = Ipv4Addr::from(start + node_offset + slot as u32);
                ContainerDetail {
                    role: role.to_string(),
                    topology_ip: address.to_string(),
                    ips: vec![format!("{address}/{prefix}")],
                    gateway: gateway.clone(),
                }
            })
            .collect();

        Ok(details)
    }

    fn get_plugin_config(&self) -> Value {
        self.config
            .as_ref()
            .and_then(|config| serde_json::to_value(config).ok())
            .unwrap_or(Value::Null)
    }
}

/// Split `a.b.c.d/len` into the numeric address, the prefix length, and
/// whether any host bits are set (a specific host address rather than the
/// network base).
fn parse_cidr(cidr: &str) -> Result<(u32, u8, bool), ScaleError> {
    let (address, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| ScaleError::config(format!("'{cidr}' is not in CIDR notation")))?;

    let address: Ipv4Addr = address
        .parse()
        .map_err(|_| ScaleError::config(format!("invalid network address in '{cidr}'")))?;
    let prefix: u8 = prefix
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| ScaleError::config(format!("invalid prefix length in '{cidr}'")))?;

    let bits = u32::from(address);
    let host_mask = if prefix == 32 { 0 } else { u32::MAX >> prefix };

    Ok((bits, prefix, bits & host_mask != 0))
}
