//! GATT handles and fixed protocol values.
//!
//! Contains the constants used to talk to the probe through `gatttool`.

/// Handle written to enable climate notifications.
pub const CLIMATE_NOTIFY_HANDLE: u16 = 0x10;

/// Value written to the notify handle (CCCD "notifications on").
pub const ENABLE_NOTIFICATIONS: &str = "0100";

/// Battery level characteristic handle.
pub const BATTERY_HANDLE: u16 = 0x18;

/// Default probe address.
pub const DEFAULT_DEVICE: &str = "4C:65:A8:D4:C5:2D";

/// Prefix of a `gatttool` notification line.
pub const NOTIFICATION_PREFIX: &str = "Notification handle = ";

/// Format a handle the way `gatttool --handle=` expects it.
///
/// # Example
///
/// ```
/// use ble_probe_exporter::ble::format_handle;
///
/// assert_eq!(format_handle(0x10), "0x10");
/// ```
pub fn format_handle(handle: u16) -> String {
    format!("{:#04x}", handle)
}

/// Check that `address` is a colon-separated 48-bit MAC address.
pub fn is_valid_device_address(address: &str) -> bool {
    let parts: Vec<&str> = address.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Check if a tool output line is a notification.
pub fn is_notification_line(line: &str) -> bool {
    line.starts_with(NOTIFICATION_PREFIX)
}
