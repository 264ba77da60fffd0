//! Protocol module for decoding tool output.
//!
//! This module contains the implementations for:
//! - Notification line decoding (hex payload and `T=.. H=..` text)
//! - Battery register conversion

pub mod battery;
pub mod notification;

pub use battery::battery_percentage;
pub use notification::{decode_notification, parse_plaintext};
