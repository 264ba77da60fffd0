//! Reading data structures.
//!
//! Contains the values produced by one poll of the probe.

/// Temperature and humidity decoded from a notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub hygrometry: f64,
}

impl ClimateSample {
    /// Create a new ClimateSample.
    pub fn new(temperature: f64, hygrometry: f64) -> Self {
        Self {
            temperature,
            hygrometry,
        }
    }
}

/// One complete reading from the probe.
///
/// A reading only exists once every value has been parsed, so all three
/// fields are always populated. It cannot be modified after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    temperature: f64,
    hygrometry: f64,
    battery_level: f64,
}

impl Reading {
    /// Create a new Reading.
    ///
    /// # Arguments
    ///
    /// * `temperature` - Temperature in degrees Celsius
    /// * `hygrometry` - Relative humidity in percent
    /// * `battery_level` - Battery level in percent (may exceed 100)
    pub fn new(temperature: f64, hygrometry: f64, battery_level: f64) -> Self {
        Self {
            temperature,
            hygrometry,
            battery_level,
        }
    }

    /// Combine a climate sample with a battery level.
    pub fn from_parts(climate: ClimateSample, battery_level: f64) -> Self {
        Self::new(climate.temperature, climate.hygrometry, battery_level)
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relative humidity in percent.
    pub fn hygrometry(&self) -> f64 {
        self.hygrometry
    }

    /// Battery level in percent.
    pub fn battery_level(&self) -> f64 {
        self.battery_level
    }
}
