use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use serde_json::Value;
use shared::app::{AppContext, NetworkInfo};
use shared::models::profile::Profile;

use scale::{ensure_registered, BuiltinSource, PluginRegistry, PluginSource};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Phase {
    /// Spec-generation phase: print the node specs the profile scales to.
    Configure,
    /// Post-provisioning phase: print per-node container assignments.
    PostStart,
}

#[derive(Parser)]
#[command(name = "scale", about = "Generate node specs from a scaling profile")]
struct Args {
    /// Path to a profile JSON document
    profile: PathBuf,

    /// Orchestration phase to run
    #[arg(long, value_enum, default_value_t = Phase::Configure)]
    phase: Phase,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Network resolution backed by the profile itself: the identifier is the
/// declared network name and the prefix comes from the CIDR, when present.
/// The real orchestrator resolves against the experiment topology instead.
struct ProfileNetworks;

impl AppContext for ProfileNetworks {
    fn process_networks(&self, network: &Value) -> Result<(String, Vec<NetworkInfo>)> {
        let name = network
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let mut infos = Vec::new();
        if let Some(cidr) = network.get("network").and_then(Value::as_str) {
            if let Some(prefix) = cidr
                .split_once('/')
                .and_then(|(_, prefix)| prefix.parse::<u8>().ok())
            {
                infos.push(NetworkInfo::with_prefix(prefix));
            }
        }

        Ok((name, infos))
    }

    fn get_gateway(&self, _network: &str) -> Option<String> {
        None
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = match args.log_level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info, // Default to Info if the level is unrecognized
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let raw = std::fs::read_to_string(&args.profile)
        .with_context(|| format!("failed to read profile {}", args.profile.display()))?;
    let profile: Profile = serde_json::from_str(&raw).context("profile is not a JSON mapping")?;

    let plugin_ref = profile.plugin_ref();
    info!(
        "profile '{}' uses plugin '{}' (version '{}')",
        profile.name(),
        plugin_ref.name,
        plugin_ref.version
    );

    let mut registry = PluginRegistry::new();
    let sources: Vec<Box<dyn PluginSource>> = vec![Box::new(BuiltinSource)];
    ensure_registered(&mut registry, &sources, &plugin_ref)?;
    let mut plugin = registry.resolve(&plugin_ref.name, &plugin_ref.version)?;

    let app = ProfileNetworks;
    plugin.validate_profile(&profile)?;

    let output = match args.phase {
        Phase::Configure => {
            plugin.pre_configure(&app, &profile)?;
            let nodes: Vec<_> = (1..=plugin.get_node_count())
                .map(|index| plugin.get_node_spec(index))
                .collect();
            serde_json::json!({
                "plugin": plugin.get_plugin_config(),
                "nodes": nodes,
            })
        }
        Phase::PostStart => {
            plugin.pre_post_start(&app, &profile)?;
            let mut nodes = Vec::new();
            for index in 1..=plugin.get_node_count() {
                let hostname = plugin.get_hostname(index);
                let details = plugin.get_container_details(&app, index)?;
                let commands = plugin.get_additional_startup_commands(index, &hostname);
                nodes.push(serde_json::json!({
                    "hostname": hostname,
                    "container_count": plugin.get_container_count(index),
                    "containers": details,
                    "startup_commands": commands,
                }));
            }
            serde_json::json!({
                "plugin": plugin.get_plugin_config(),
                "nodes": nodes,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
