//! Data structures for probe readings.

pub mod reading;

pub use reading::{ClimateSample, Reading};
