//! Error types for BMS record and link operations.

use thiserror::Error;

/// Result type alias for BMS operations.
pub type Result<T> = std::result::Result<T, BmsError>;

/// Error types for BMS configuration and monitoring.
#[derive(Error, Debug)]
pub enum BmsError {
    /// Byte sequence length does not match the record layout
    #[error("Malformed {record} record: expected {expected} bytes, got {actual}")]
    MalformedRecord {
        /// Record type being decoded
        record: &'static str,
        /// Fixed width of the record
        expected: usize,
        /// Length of the input
        actual: usize,
    },

    /// Physical value cannot be stored in the field's byte
    #[error("{field} out of range: {value} (representable {min}..={max})")]
    OutOfRange {
        /// Field being set
        field: &'static str,
        /// Rejected value
        value: f64,
        /// Smallest representable value
        min: f64,
        /// Largest representable value
        max: f64,
    },

    /// Serial port communication error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication timeout (no response from the BMS)
    #[error("Communication timeout")]
    Timeout,

    /// A previous read failed partway and the stream is out of step
    #[error("Link out of step after a failed read; clear input before reading again")]
    Desynced,

    /// Profile file could not be parsed
    #[error("Profile parse error: {0}")]
    ProfileParse(#[from] toml::de::Error),

    /// Profile could not be serialized
    #[error("Profile write error: {0}")]
    ProfileWrite(#[from] toml::ser::Error),
}
