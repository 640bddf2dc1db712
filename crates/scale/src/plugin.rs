use serde_json::Value;
use shared::app::AppContext;
use shared::models::node::{ContainerDetail, NodeSpec};
use shared::models::profile::Profile;

use crate::error::ScaleError;

/// Capability set every scaling strategy implements.
///
/// The registry and the orchestrator depend only on this trait, never on a
/// concrete strategy type. Node indices are 1-based throughout. A strategy
/// instance belongs to one orchestration phase for one profile; the two
/// phases may run in separate process invocations, which is why
/// [`ScalePlugin::pre_post_start`] must configure from scratch.
pub trait ScalePlugin {
    /// Optional pre-check before configuration.
    fn validate_profile(&self, _profile: &Profile) -> Result<(), ScaleError> {
        Ok(())
    }

    /// Build and store the validated config for the spec-generation phase.
    fn pre_configure(&mut self, app: &dyn AppContext, profile: &Profile) -> Result<(), ScaleError>;

    /// Build and store the validated config for the post-provisioning phase.
    /// Must not assume `pre_configure` ran in the same process.
    fn pre_post_start(&mut self, app: &dyn AppContext, profile: &Profile)
        -> Result<(), ScaleError>;

    /// Number of nodes this profile scales to. At least 1 once configured.
    fn get_node_count(&self) -> u32;

    /// Hostname for node `index`.
    fn get_hostname(&self, index: u32) -> String;

    /// Declarative spec for node `index`, produced fresh per call.
    fn get_node_spec(&self, index: u32) -> NodeSpec;

    /// Invoked once per node after its spec has been appended to the
    /// topology.
    fn on_node_configured(
        &mut self,
        _app: &dyn AppContext,
        _index: u32,
        _hostname: &str,
    ) -> Result<(), ScaleError> {
        Ok(())
    }

    /// Extra provisioning commands injected into the node's startup
    /// sequence.
    fn get_additional_startup_commands(&self, _index: u32, _hostname: &str) -> String {
        String::new()
    }

    /// Workload units assigned to node `index`.
    fn get_container_count(&self, index: u32) -> u32;

    /// Role-tagged workload endpoints for node `index`.
    fn get_container_details(
        &self,
        _app: &dyn AppContext,
        _index: u32,
    ) -> Result<Vec<ContainerDetail>, ScaleError> {
        Ok(Vec::new())
    }

    /// The effective validated config, exposed for persistence and
    /// debugging. `Value::Null` before configuration.
    fn get_plugin_config(&self) -> Value;
}

impl std::fmt::Debug for dyn ScalePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ScalePlugin")
    }
}
