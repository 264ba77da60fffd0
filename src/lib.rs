//! # ble-probe-exporter
//!
//! A Prometheus exporter for Bluetooth Low Energy temperature/humidity
//! probes (Xiaomi MJ_HT_V1 and compatible) read through BlueZ's `gatttool`.
//!
//! Each scrape polls the probe once:
//!
//! 1. Write `0100` to the climate handle and listen for the first
//!    notification, e.g. `T=28.3 H=54.1` encoded as hex bytes.
//! 2. Read the battery handle and scale it from 0-64 to a percentage.
//! 3. Answer with three gauges: `temperature`, `hygrometry` and
//!    `battery_level`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ble_probe_exporter::{format_metrics, Config, GattTool, ProbeReader, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();
//!     let tool = GattTool::new(config.probe.tool.clone(), config.probe.timeout());
//!     let reader = ProbeReader::new(config.probe, tool);
//!
//!     let reading = reader.read().await?;
//!     println!("{}", format_metrics(&reading));
//!     Ok(())
//! }
//! ```
//!
//! ## Platform Notes
//!
//! Linux only: requires BlueZ with the deprecated `gatttool` utility on
//! the `PATH`. The user may need to be in the `bluetooth` group.

// Public modules
pub mod ble;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod protocol;
pub mod server;

// Re-exports for convenience
pub use ble::{GattTool, ProbeTool};
pub use config::{Config, ProbeConfig, ServerConfig};
pub use data::{ClimateSample, Reading};
pub use error::{Error, Result};
pub use metrics::format_metrics;
pub use probe::ProbeReader;
pub use server::serve;
