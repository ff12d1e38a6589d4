//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::TransportMode;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    transport: TransportInfo,
    bridge: BridgeInfo,
}

#[derive(Serialize)]
struct TransportInfo {
    mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    port: u16,
    endpoint: String,
}

#[derive(Serialize)]
struct BridgeInfo {
    fetch_retry_secs: u64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn endpoint_of(config: &contracts::BridgeConfig) -> String {
    match config.transport.mode {
        TransportMode::Multicast => format!(
            "{}:{}",
            contracts::MULTICAST_GROUP,
            contracts::MULTICAST_PORT
        ),
        _ => format!(
            "{}:{}",
            config.transport.host.as_deref().unwrap_or("-"),
            config.transport.effective_port()
        ),
    }
}

fn build_config_info(config: &contracts::BridgeConfig) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", config.version),
        transport: TransportInfo {
            mode: config.transport.mode.to_string(),
            host: config.transport.host.clone(),
            port: config.transport.effective_port(),
            endpoint: endpoint_of(config),
        },
        bridge: BridgeInfo {
            fetch_retry_secs: config.bridge.fetch_retry_secs,
        },
    }
}

fn print_config_info(config: &contracts::BridgeConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 CoT Bridge Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📡 Transport");
    println!("   ├─ Version: {:?}", config.version);
    println!("   ├─ Mode: {}", config.transport.mode);
    match config.transport.mode {
        TransportMode::Multicast => {
            println!(
                "   └─ Group: {}:{} (fixed)",
                contracts::MULTICAST_GROUP,
                contracts::MULTICAST_PORT
            );
        }
        TransportMode::ReliableStream => {
            println!("   └─ Server: {}", endpoint_of(config));
        }
        TransportMode::DirectUnicast => {
            println!("   └─ Target: {}", endpoint_of(config));
        }
    }

    println!("\n⚙️  Bridge");
    println!(
        "   └─ Fetch retry pause: {}s",
        config.bridge.fetch_retry_secs
    );

    println!();
}
