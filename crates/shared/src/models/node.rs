use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of one virtual node, appended verbatim into the
/// experiment topology by the orchestrator. The schema is fixed:
/// `{type, general:{hostname, vm_type}, hardware:{...}, network:{interfaces:[...]}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    #[serde(rename = "type")]
    pub node_type: String,
    pub general: General,
    pub hardware: Hardware,
    pub network: Network,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct General {
    pub hostname: String,
    pub vm_type: String,
}

/// Hardware fields are optional so that a strategy with no hardware opinion
/// serializes the placeholder `{}` expected by the topology schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Hardware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Network {
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One role-tagged workload endpoint on a node, produced during the
/// post-provisioning phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerDetail {
    #[serde(rename = "type")]
    pub role: String,
    pub topology_ip: String,
    pub ips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}
