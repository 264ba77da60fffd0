//! Notification line decoding.
//!
//! The probe pushes its climate values as an ASCII string such as
//! `T=28.3 H=54.1`, null terminated. `gatttool` prints the raw bytes as
//! space separated hex after the handle:
//!
//! ```text
//! Notification handle = 0x000e value: 54 3d 32 38 2e 33 20 48 3d 35 34 2e 31 00
//! ```

use tracing::debug;

use crate::data::ClimateSample;
use crate::error::{Error, Result};

/// Trailing null-terminator token.
const NULL_TOKEN: &str = "00";

/// Decode the hex payload of a notification line into plain text.
///
/// The payload starts two characters after the first `:`. A trailing `00`
/// token is dropped together with the space before it.
///
/// # Example
///
/// ```
/// use ble_probe_exporter::protocol::decode_notification;
///
/// let line = "Notification handle = 0x000e value: 54 3d 32 38 2e 33 20 48 3d 35 34 2e 31 00";
/// assert_eq!(decode_notification(line).unwrap(), "T=28.3 H=54.1");
/// ```
pub fn decode_notification(line: &str) -> Result<String> {
    let colon = line
        .find(':')
        .ok_or_else(|| Error::parse(format!("no ':' in notification line {:?}", line)))?;

    let mut payload = line.get(colon + 2..).unwrap_or("");
    if payload.ends_with(NULL_TOKEN) {
        payload = payload
            .get(..payload.len().saturating_sub(NULL_TOKEN.len() + 1))
            .unwrap_or("");
    }

    let text = payload
        .split(' ')
        .map(|token| {
            u8::from_str_radix(token, 16)
                .map(char::from)
                .map_err(|e| Error::parse(format!("invalid hex byte {:?}: {}", token, e)))
        })
        .collect::<Result<String>>()?;

    debug!("Decoded notification payload {:?} as {:?}", payload, text);
    Ok(text)
}

/// Parse a `T=<number> H=<number>` string.
///
/// Only the values are looked at: the first token is the temperature and
/// the second is the humidity, whatever their keys. Tokens past the second
/// are ignored.
pub fn parse_plaintext(text: &str) -> Result<ClimateSample> {
    let mut tokens = text.split(' ');
    let temperature = parse_value(tokens.next(), text)?;
    let hygrometry = parse_value(tokens.next(), text)?;
    Ok(ClimateSample::new(temperature, hygrometry))
}

fn parse_value(token: Option<&str>, text: &str) -> Result<f64> {
    let value = token
        .and_then(|t| t.split('=').nth(1))
        .ok_or_else(|| Error::parse(format!("expected 'T=<n> H=<n>', got {:?}", text)))?;

    value
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::parse(format!("invalid number {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LINE: &str =
        "Notification handle = 0x000e value: 54 3d 32 38 2e 33 20 48 3d 35 34 2e 31 00";

    fn encode(text: &str) -> String {
        text.bytes()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_decode_notification() {
        assert_eq!(decode_notification(LINE).unwrap(), "T=28.3 H=54.1");
    }

    #[test]
    fn test_decode_without_null_terminator() {
        let line = "Notification handle = 0x000e value: 54 3d 32 35 2e 30";
        assert_eq!(decode_notification(line).unwrap(), "T=25.0");
    }

    #[test]
    fn test_decode_no_colon() {
        let result = decode_notification("Notification handle = 0x000e");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_decode_invalid_hex() {
        let result = decode_notification("value: 54 zz 00");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_decode_empty_payload() {
        // Nothing after the colon leaves a single empty token.
        assert!(decode_notification("value:").is_err());
        assert!(decode_notification("value: 00").is_err());
    }

    #[test]
    fn test_parse_plaintext() {
        let sample = parse_plaintext("T=28.3 H=54.1").unwrap();
        assert_eq!(sample, ClimateSample::new(28.3, 54.1));
    }

    #[test]
    fn test_parse_plaintext_negative_temperature() {
        let sample = parse_plaintext("T=-4.5 H=81.0").unwrap();
        assert_eq!(sample.temperature, -4.5);
        assert_eq!(sample.hygrometry, 81.0);
    }

    #[test]
    fn test_parse_plaintext_ignores_keys_and_extra_tokens() {
        let sample = parse_plaintext("X=1.5 Y=2.5 Z=3.5").unwrap();
        assert_eq!(sample, ClimateSample::new(1.5, 2.5));
    }

    #[test]
    fn test_parse_plaintext_malformed() {
        assert!(parse_plaintext("T=28.3").is_err());
        assert!(parse_plaintext("T28.3 H54.1").is_err());
        assert!(parse_plaintext("T=abc H=54.1").is_err());
        assert!(parse_plaintext("").is_err());
    }

    #[test]
    fn test_decode_then_parse() {
        let sample = parse_plaintext(&decode_notification(LINE).unwrap()).unwrap();
        assert_eq!(sample.temperature, 28.3);
        assert_eq!(sample.hygrometry, 54.1);
    }

    proptest! {
        #[test]
        fn prop_null_terminator_is_stripped(text in "[ -~]{1,40}") {
            let line = format!("Notification handle = 0x000e value: {} 00", encode(&text));
            prop_assert_eq!(decode_notification(&line).unwrap(), text);
        }

        #[test]
        fn prop_nothing_stripped_without_terminator(text in "[ -~]{1,40}") {
            let line = format!("Notification handle = 0x000e value: {}", encode(&text));
            prop_assert_eq!(decode_notification(&line).unwrap(), text);
        }
    }
}
