//! DAGShield daemon: entry point for running a threat node.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dagshield_node::{NodeConfig, NodeEvent, ShutdownController, ThreatNode};
use dagshield_types::{SystemClock, Timestamp};
use dagshield_utils::{format_duration, init_logging, LogFormat};

mod simulate;

#[derive(Parser)]
#[command(name = "dagshield-daemon", about = "DAGShield threat-intelligence node daemon")]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used when absent.
    #[arg(long, global = true, env = "DAGSHIELD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error". Overrides the file.
    #[arg(long, global = true, env = "DAGSHIELD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the file.
    #[arg(long, global = true, env = "DAGSHIELD_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Operate the node.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Generate a node key pair and print its identity.
    Keygen {
        /// Derive the key from a 32-byte hex seed instead of OS randomness.
        #[arg(long)]
        seed: Option<String>,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run a scripted report → vote → relay scenario in-process and print
    /// every event as JSON.
    Simulate,
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node until SIGINT/SIGTERM.
    Run,
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the default configuration as TOML.
    Default,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    match cli.command {
        Command::Config {
            action: ConfigAction::Default,
        } => {
            print!("{}", NodeConfig::default().to_toml_string()?);
        }
        Command::Keygen { seed } => {
            let probe = NodeConfig {
                node_seed: seed,
                ..NodeConfig::default()
            };
            let keypair = probe.node_keypair()?;
            println!("identity = \"{}\"", keypair.identity());
            println!("node_seed = \"{}\"", hex::encode(&keypair.private.0));
        }
        Command::Simulate => {
            init_logging(config.log_format, &config.log_level)?;
            simulate::run().await?;
        }
        Command::Node {
            action: NodeAction::Run,
        } => {
            init_logging(config.log_format, &config.log_level)?;
            run_node(config).await?;
        }
    }

    Ok(())
}

async fn run_node(config: NodeConfig) -> anyhow::Result<()> {
    let keypair = config.node_keypair()?;
    let identity = keypair.identity();
    let node = Arc::new(ThreatNode::new(&config, identity, Arc::new(SystemClock))?);
    let shutdown = Arc::new(ShutdownController::new());

    tracing::info!(
        %identity,
        chains = config.chains.len(),
        dispatch_every = %format_duration(config.dispatch_interval_secs),
        "starting DAGShield node"
    );

    let mut events = node.subscribe();
    let mut stop_events = shutdown.subscribe();
    let event_logger = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "event log lagging");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
                _ = stop_events.wait() => break,
            }
        }
    });

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move { signal_shutdown.wait_for_signal().await });

    let mut stop = shutdown.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(config.dispatch_interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = node.review_pending(&identity).await {
                    tracing::warn!(error = %e, "automatic review failed");
                }
                match node.flush_dispatch().await {
                    Ok(report) if report.delivered + report.dropped > 0 => {
                        tracing::info!(
                            delivered = report.delivered,
                            duplicates = report.duplicates,
                            requeued = report.requeued,
                            dropped = report.dropped,
                            "dispatch pass"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "dispatch pass failed"),
                }
            }
            reason = stop.wait() => {
                tracing::info!(%reason, "shutdown signal received, stopping node");
                break;
            }
        }
    }

    let _ = event_logger.await;
    if config.enable_metrics {
        print!("{}", node.metrics.encode_text()?);
    }
    tracing::info!(at = %Timestamp::now(), "DAGShield daemon exited cleanly");
    Ok(())
}

fn log_event(event: &NodeEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::info!(event = %json, "node event"),
        Err(e) => tracing::warn!(error = %e, "unprintable node event"),
    }
}
