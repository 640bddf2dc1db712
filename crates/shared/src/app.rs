use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-network information resolved by the orchestrator, typically from the
/// experiment topology. Only the prefix length is interpreted here; anything
/// else the orchestrator knows about the network rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkInfo {
    pub prefix: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkInfo {
    pub fn with_prefix(prefix: u8) -> Self {
        Self {
            prefix,
            extra: Map::new(),
        }
    }
}

/// The slice of the orchestrator that scaling strategies are allowed to talk
/// to. Strategies never see the topology document or the virtualization
/// control plane directly.
pub trait AppContext {
    /// Resolve a profile network description into a network identifier plus
    /// the info blocks known for that network.
    fn process_networks(&self, network: &Value) -> Result<(String, Vec<NetworkInfo>)>;

    /// Gateway address for the given network identifier, when one exists.
    fn get_gateway(&self, network: &str) -> Option<String>;
}

/// Context with no network knowledge. Sufficient for strategies (and phases)
/// that never resolve external networks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAppContext;

impl AppContext for NullAppContext {
    fn process_networks(&self, _network: &Value) -> Result<(String, Vec<NetworkInfo>)> {
        anyhow::bail!("network resolution is not available in this context")
    }

    fn get_gateway(&self, _network: &str) -> Option<String> {
        None
    }
}
