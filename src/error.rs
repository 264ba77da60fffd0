//! Error types for the ble-probe-exporter crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The probe did not answer with a notification line.
    ///
    /// `output` holds the raw line the tool produced instead. The HTTP
    /// handler sends it back verbatim as the body of a 500 response.
    #[error("{output}")]
    ProbeUnavailable {
        /// Raw tool output.
        output: String,
    },

    /// Tool output could not be decoded into numbers.
    #[error("Parse error: {context}")]
    Parse {
        /// Description of what could not be parsed.
        context: String,
    },

    /// The configuration file or a configuration value is invalid.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },

    /// I/O failure while talking to the tool or the network.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Parse`] from anything printable.
    pub(crate) fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
        }
    }

    /// Check if this is the probe-unavailable failure.
    pub fn is_probe_unavailable(&self) -> bool {
        matches!(self, Self::ProbeUnavailable { .. })
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
