//! BLE access module.
//!
//! This module wraps the external `gatttool` program used to talk to
//! the probe, along with the fixed handles of the device.

pub mod gatttool;
pub mod handles;

pub use gatttool::{GattTool, ProbeTool};
pub use handles::*;
