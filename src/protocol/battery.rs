//! Battery level conversion.

use crate::error::{Error, Result};

/// Full-scale value of the battery register.
pub const BATTERY_FULL_SCALE: f64 = 64.0;

/// Convert a raw battery register value to a percentage.
///
/// `percentage = 100 * raw / 64`. The result is not clamped, so values
/// above 64 yield more than 100 percent.
///
/// # Arguments
///
/// * `raw` - The register value as decimal text, surrounding whitespace allowed
///
/// # Example
///
/// ```
/// use ble_probe_exporter::protocol::battery_percentage;
///
/// assert_eq!(battery_percentage("60").unwrap(), 93.75);
/// ```
pub fn battery_percentage(raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::parse(format!("invalid battery value {:?}: {}", raw, e)))?;
    Ok(100.0 * value / BATTERY_FULL_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_percentage() {
        assert_eq!(battery_percentage("60").unwrap(), 93.75);
        assert_eq!(battery_percentage("64").unwrap(), 100.0);
        assert_eq!(battery_percentage("0").unwrap(), 0.0);
    }

    #[test]
    fn test_battery_percentage_not_clamped() {
        assert_eq!(battery_percentage("70").unwrap(), 109.375);
    }

    #[test]
    fn test_battery_percentage_whitespace() {
        assert_eq!(battery_percentage(" 32\n").unwrap(), 50.0);
    }

    #[test]
    fn test_battery_percentage_invalid() {
        assert!(matches!(battery_percentage(""), Err(Error::Parse { .. })));
        assert!(matches!(
            battery_percentage("connect error"),
            Err(Error::Parse { .. })
        ));
    }
}
