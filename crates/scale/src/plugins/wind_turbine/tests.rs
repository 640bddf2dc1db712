use super::*;
use anyhow::Result;
use shared::app::{NetworkInfo, NullAppContext};

/// Stands in for the orchestrator's network processing during tests.
struct StubApp {
    network_id: String,
    prefix: u8,
    gateway: Option<String>,
}

impl StubApp {
    fn new() -> Self {
        Self {
            network_id: "test_net".to_string(),
            prefix: 24,
            gateway: None,
        }
    }
}

impl AppContext for StubApp {
    fn process_networks(&self, _network: &Value) -> Result<(String, Vec<NetworkInfo>)> {
        Ok((
            self.network_id.clone(),
            vec![NetworkInfo::with_prefix(self.prefix)],
        ))
    }

    fn get_gateway(&self, _network: &str) -> Option<String> {
        self.gateway.clone()
    }
}

fn profile(value: Value) -> Profile {
    serde_json::from_value(value).unwrap()
}

fn configured(value: Value) -> WindTurbine {
    let mut plugin = WindTurbine::default();
    plugin.pre_configure(&NullAppContext, &profile(value)).unwrap();
    plugin
}

#[test]
fn test_pre_configure_defaults() {
    let plugin = configured(serde_json::json!({
        "name": "test-profile",
        "count": 5,
        "container_template": {"external_network": {"name": "EXT"}}
    }));

    let config = plugin.config.as_ref().unwrap();
    assert_eq!(config.count, 5);
    assert_eq!(config.name, "test-profile");

    assert_eq!(plugin.get_node_count(), 5);
    let spec = plugin.get_node_spec(1);
    assert_eq!(spec.hardware.vcpus, Some(8));
    assert_eq!(spec.hardware.memory, Some(16384));
    assert_eq!(spec.general.hostname, "test-profile-1");
}

#[test]
fn test_pre_configure_overrides() {
    let plugin = configured(serde_json::json!({
        "name": "custom-farm",
        "count": 2,
        "node_template": {
            "cpu": 4,
            "memory": 4096,
            "image": "custom.qc2",
            "network": {
                "interfaces": [{"name": "eth1", "vlan": "200"}]
            }
        },
        "container_template": {"external_network": {"name": "EXT"}}
    }));

    let config = plugin.config.as_ref().unwrap();
    assert_eq!(config.count, 2);
    assert_eq!(config.node_template.cpu, Some(4));

    assert_eq!(plugin.get_node_count(), 2);
    let spec = plugin.get_node_spec(1);
    assert_eq!(spec.hardware.vcpus, Some(4));
    assert_eq!(spec.hardware.memory, Some(4096));
    assert_eq!(spec.hardware.image.as_deref(), Some("custom.qc2"));
    assert_eq!(spec.network.interfaces[0].name, "eth1");
    assert_eq!(spec.network.interfaces[0].vlan.as_deref(), Some("200"));
    assert_eq!(spec.general.hostname, "custom-farm-1");
}

#[test]
fn test_config_validation() {
    let mut plugin = WindTurbine::default();

    let err = plugin
        .pre_configure(
            &NullAppContext,
            &profile(serde_json::json!({"name": "invalid-profile", "count": 0})),
        )
        .unwrap_err();
    assert!(matches!(err, ScaleError::Config(_)));

    // external_network is required whenever nodes will be produced.
    let err = plugin
        .pre_configure(
            &NullAppContext,
            &profile(serde_json::json!({"name": "invalid-profile", "count": 1})),
        )
        .unwrap_err();
    assert!(err.to_string().contains("external_network must be defined"));
}

#[test]
fn test_pre_post_start_configures_independently() {
    let mut plugin = WindTurbine::default();
    assert!(plugin.config.is_none());

    plugin
        .pre_post_start(
            &NullAppContext,
            &profile(serde_json::json!({
                "name": "post-start-profile",
                "count": 3,
                "container_template": {"external_network": {"name": "EXT"}}
            })),
        )
        .unwrap();

    assert!(plugin.config.is_some());
    assert_eq!(plugin.get_node_count(), 3);
}

#[test]
fn test_container_count_is_fixed_per_node() {
    let plugin = configured(serde_json::json!({
        "count": 1,
        "container_template": {"external_network": {"name": "EXT"}}
    }));

    assert_eq!(plugin.get_container_count(1), 6);
    assert_eq!(plugin.get_container_count(7), 6);
}

#[test]
fn test_addressing_starts_after_network_base() {
    let plugin = configured(serde_json::json!({
        "name": "cidr-test",
        "count": 1,
        "container_template": {
            "external_network": {"name": "EXT", "network": "192.168.50.0/24"}
        }
    }));

    let details = plugin.get_container_details(&StubApp::new(), 1).unwrap();
    let main_ctrl = details
        .iter()
        .find(|d| d.role == "main-controller")
        .unwrap();

    assert_eq!(main_ctrl.topology_ip, "192.168.50.1");
    assert_eq!(main_ctrl.ips[0], "192.168.50.1/24");
    assert_eq!(main_ctrl.gateway, None);
}

#[test]
fn test_addressing_starts_at_specific_host_address() {
    let plugin = configured(serde_json::json!({
        "name": "cidr-test-2",
        "count": 1,
        "container_template": {
            "external_network": {"name": "EXT", "network": "192.168.50.10/24"}
        }
    }));

    let details = plugin.get_container_details(&StubApp::new(), 1).unwrap();
    let main_ctrl = details
        .iter()
        .find(|d| d.role == "main-controller")
        .unwrap();

    assert_eq!(main_ctrl.topology_ip, "192.168.50.10");
    assert_eq!(main_ctrl.ips[0], "192.168.50.10/24");
}

#[test]
fn test_addressing_is_sequential_across_roles_and_nodes() {
    let plugin = configured(serde_json::json!({
        "name": "farm",
        "count": 2,
        "container_template": {
            "external_network": {"name": "EXT", "network": "192.168.50.0/24"}
        }
    }));

    let app = StubApp::new();
    let node1 = plugin.get_container_details(&app, 1).unwrap();
    let node2 = plugin.get_container_details(&app, 2).unwrap();

    assert_eq!(node1.len(), 6);
    assert_eq!(node1[0].topology_ip, "192.168.50.1");
    assert_eq!(node1[5].topology_ip, "192.168.50.6");
    // Node 2 continues where node 1 left off.
    assert_eq!(node2[0].topology_ip, "192.168.50.7");
    assert_eq!(node2[5].topology_ip, "192.168.50.12");
}

#[test]
fn test_addressing_requires_cidr() {
    let plugin = configured(serde_json::json!({
        "name": "no-cidr",
        "count": 1,
        "container_template": {"external_network": {"name": "EXT"}}
    }));

    let err = plugin
        .get_container_details(&StubApp::new(), 1)
        .unwrap_err();
    assert!(err.to_string().contains("CIDR"));
}

#[test]
fn test_gateway_is_attached_when_known() {
    let plugin = configured(serde_json::json!({
        "name": "gw",
        "count": 1,
        "container_template": {
            "external_network": {"name": "EXT", "network": "192.168.50.0/24"}
        }
    }));

    let app = StubApp {
        gateway: Some("192.168.50.254".to_string()),
        ..StubApp::new()
    };
    let details = plugin.get_container_details(&app, 1).unwrap();
    assert_eq!(details[0].gateway.as_deref(), Some("192.168.50.254"));
}

#[test]
fn test_parse_cidr() {
    let (base, prefix, has_host_bits) = parse_cidr("192.168.50.0/24").unwrap();
    assert_eq!(Ipv4Addr::from(base), Ipv4Addr::new(192, 168, 50, 0));
    assert_eq!(prefix, 24);
    assert!(!has_host_bits);

    let (_, _, has_host_bits) = parse_cidr("192.168.50.10/24").unwrap();
    assert!(has_host_bits);

    assert!(parse_cidr("192.168.50.0").is_err());
    assert!(parse_cidr("not-an-address/24").is_err());
    assert!(parse_cidr("192.168.50.0/33").is_err());
}
