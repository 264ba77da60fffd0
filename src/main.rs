//! ble-probe-exporter: serve BLE probe readings to Prometheus
//!
//! Polls the probe once at startup, then answers every HTTP GET with a
//! fresh reading.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ble_probe_exporter::{format_metrics, serve, Config, GattTool, ProbeReader};

// === CLI ===

#[derive(Parser)]
#[command(name = "ble-probe-exporter")]
#[command(about = "Prometheus exporter for BLE temperature/humidity probes")]
struct Cli {
    /// Config file (default: ~/.config/ble-probe-exporter/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    address: Option<IpAddr>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Probe MAC address
    #[arg(short, long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the probe once and print the metrics
    Read,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(address) = self.address {
            config.server.address = address;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(device) = &self.device {
            config.probe.device = device.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    let tool = GattTool::new(config.probe.tool.clone(), config.probe.timeout());
    let reader = ProbeReader::new(config.probe.clone(), tool);

    match cli.command {
        Some(Commands::Read) => {
            let reading = reader.read().await?;
            println!("{}", format_metrics(&reading));
        }
        None => {
            run_server(config, reader).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config, reader: ProbeReader<GattTool>) -> anyhow::Result<()> {
    let reading = reader
        .read()
        .await
        .context("probe check before starting the webserver failed")?;
    tracing::info!(
        "Checking the probe once before starting the webserver: {:?}",
        reading
    );

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    serve(listener, Arc::new(reader), async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    tracing::info!("ble-probe-exporter stopped");
    Ok(())
}
