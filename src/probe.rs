//! Probe reader.
//!
//! Polls a probe for one complete [`Reading`] using a [`ProbeTool`].

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ble::gatttool::ProbeTool;
use crate::ble::handles::is_notification_line;
use crate::config::ProbeConfig;
use crate::data::Reading;
use crate::error::{Error, Result};
use crate::protocol::{battery_percentage, decode_notification, parse_plaintext};

/// Reads temperature, humidity and battery level from one probe.
pub struct ProbeReader<T> {
    /// Device address and handles.
    config: ProbeConfig,
    /// Tool used to reach the device.
    tool: T,
    /// Held for the duration of a poll so tool sessions never overlap.
    session: Mutex<()>,
}

impl<T: ProbeTool> ProbeReader<T> {
    /// Create a new probe reader.
    pub fn new(config: ProbeConfig, tool: T) -> Self {
        Self {
            config,
            tool,
            session: Mutex::new(()),
        }
    }

    /// Get the probe configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Poll the probe once.
    ///
    /// Runs a notification listen followed by a battery read. Nothing is
    /// retried; the first failure is returned and no partial reading is
    /// produced.
    ///
    /// # Errors
    ///
    /// * [`Error::ProbeUnavailable`] if the listen output is not a
    ///   notification line
    /// * [`Error::Parse`] if either output cannot be decoded
    pub async fn read(&self) -> Result<Reading> {
        let _session = self.session.lock().await;
        let device = self.config.device.as_str();

        let line = self
            .tool
            .listen(device, self.config.notify_handle, &self.config.notify_payload)
            .await?;
        if !is_notification_line(&line) {
            return Err(Error::ProbeUnavailable { output: line });
        }

        let climate = parse_plaintext(&decode_notification(&line)?)?;
        debug!(
            "Probe {} reports T={} H={}",
            device, climate.temperature, climate.hygrometry
        );

        let output = self.tool.read(device, self.config.battery_handle).await?;
        let raw_battery = output.rsplit(':').next().unwrap_or_default().trim();
        let battery_level = battery_percentage(raw_battery)?;

        let reading = Reading::from_parts(climate, battery_level);
        info!("Read probe {}: {:?}", device, reading);
        Ok(reading)
    }
}
