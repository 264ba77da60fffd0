//! Prometheus text exposition.
//!
//! Every value is exported as a gauge with an empty HELP line:
//!
//! ```text
//! # HELP
//! # TYPE temperature gauge
//! temperature 26.5
//! ```

use crate::data::Reading;

/// Metric names in output order.
pub const METRIC_NAMES: [&str; 3] = ["temperature", "hygrometry", "battery_level"];

/// Format a reading as Prometheus exposition text.
///
/// Stanzas are emitted for temperature, hygrometry and battery_level, in
/// that order, joined by newlines without a trailing newline.
///
/// # Example
///
/// ```
/// use ble_probe_exporter::{format_metrics, Reading};
///
/// let text = format_metrics(&Reading::new(26.5, 45.0, 93.75));
/// assert!(text.ends_with("battery_level 93.75"));
/// ```
pub fn format_metrics(reading: &Reading) -> String {
    let values = [
        reading.temperature(),
        reading.hygrometry(),
        reading.battery_level(),
    ];

    METRIC_NAMES
        .iter()
        .zip(values)
        .flat_map(|(name, value)| {
            [
                "# HELP".to_string(),
                format!("# TYPE {} gauge", name),
                format!("{} {}", name, format_value(value)),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shortest round-trip decimal, always with a fractional part (`45.0`).
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_metrics() {
        let text = format_metrics(&Reading::new(26.5, 45.0, 93.75));
        let expected = "\
# HELP
# TYPE temperature gauge
temperature 26.5
# HELP
# TYPE hygrometry gauge
hygrometry 45.0
# HELP
# TYPE battery_level gauge
battery_level 93.75";
        assert_eq!(text, expected);
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(26.5), "26.5");
        assert_eq!(format_value(45.0), "45.0");
        assert_eq!(format_value(93.75), "93.75");
        assert_eq!(format_value(109.375), "109.375");
        assert_eq!(format_value(-4.5), "-4.5");
        assert_eq!(format_value(28.3), "28.3");
    }

    #[test]
    fn test_no_trailing_newline() {
        let text = format_metrics(&Reading::new(0.0, 0.0, 0.0));
        assert!(!text.ends_with('\n'));
        assert!(text.ends_with("battery_level 0.0"));
    }
}
