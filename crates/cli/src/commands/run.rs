//! `run` command implementation.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bridge::{BridgeLoop, StdinSource};
use config_loader::{ConfigFormat, ConfigLoader};
use contracts::BridgeConfig;

use crate::cli::RunArgs;
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_bridge(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    // Parse first, validate after CLI overrides are applied
    let format = detect_format(args)?;
    let content = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config from {}", args.config.display()))?;
    let mut config = ConfigLoader::parse_from_str(&content, format)
        .with_context(|| format!("Failed to parse config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding transport host from CLI");
        config.transport.host = Some(host.clone());
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding transport port from CLI");
        config.transport.port = Some(port);
    }

    ConfigLoader::validate(&config).context("Configuration validation failed")?;

    info!(
        mode = %config.transport.mode,
        host = config.transport.host.as_deref().unwrap_or("-"),
        port = config.transport.effective_port(),
        fetch_retry_secs = config.bridge.fetch_retry_secs,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Metrics endpoint
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to initialize metrics endpoint")?;
    }

    // Construct the transport up front so endpoint errors surface before
    // the first detection is consumed
    let transport = transport::build_transport(&config.transport)
        .await
        .map_err(|e| CliError::transport_setup(config.transport.mode.to_string(), e.to_string()))?;

    let source = StdinSource::new();
    let mut bridge = BridgeLoop::new(source, transport, config.bridge.clone());

    // Graceful shutdown: signal cancels the token, the loop drains
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, draining delivery loop...");
        signal_cancel.cancel();
    });

    info!("Starting delivery loop...");

    let stats = bridge.run(cancel).await;

    info!(
        fetched = stats.messages_fetched,
        sent = stats.sends_ok,
        send_failures = stats.send_failures,
        duration_secs = stats.duration.as_secs_f64(),
        "Delivery loop completed"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("CoT Bridge finished");
    Ok(())
}

fn detect_format(args: &RunArgs) -> Result<ConfigFormat> {
    let ext = args
        .config
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    ConfigFormat::from_extension(ext)
        .ok_or_else(|| anyhow::anyhow!("Unsupported config format: .{ext}"))
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode.
fn print_config_summary(config: &BridgeConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Transport:");
    println!("  Mode: {}", config.transport.mode);
    match config.transport.mode {
        contracts::TransportMode::Multicast => {
            println!(
                "  Group: {}:{}",
                contracts::MULTICAST_GROUP,
                contracts::MULTICAST_PORT
            );
        }
        _ => {
            println!(
                "  Endpoint: {}:{}",
                config.transport.host.as_deref().unwrap_or("-"),
                config.transport.effective_port()
            );
        }
    }
    println!("\nBridge:");
    println!("  Fetch retry pause: {}s", config.bridge.fetch_retry_secs);
    println!();
}
