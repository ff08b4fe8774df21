//! Layout and link constants for BMS communication.
//!
//! This module defines the fixed record widths, the decode scales of the
//! byte-packed calibration fields, and the serial port configuration.

use crate::scale::Scale;

/// Width of an encoded configuration record (22 one-byte fields)
pub const CONFIG_RECORD_LEN: usize = 22;

/// Width of an encoded status record
pub const STATUS_RECORD_LEN: usize = 1 + 1 + 4 + 4 + 4 + 4 + 4;

/// `full_voltage`: raw × 2 → volts
pub const FULL_VOLTAGE_SCALE: Scale = Scale::new(2, 1);

/// `current_warn_thresh`, `overcurrent_thresh`: raw × 10 → amps
pub const CURRENT_SCALE: Scale = Scale::new(10, 1);

/// `peukerts_exponent`: raw ÷ 10 → exponent
pub const PEUKERT_SCALE: Scale = Scale::new(1, 10);

/// Cell thresholds: raw × 0.05 → volts
pub const CELL_VOLTAGE_SCALE: Scale = Scale::new(1, 20);

/// Default baud rate (9600 bps)
pub const BAUD_RATE: u32 = 9600;

/// Read timeout in milliseconds
pub const TIMEOUT_MS: u64 = 2000;

/// Data bits per character
pub const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;

/// Stop bits configuration
pub const STOP_BITS: serialport::StopBits = serialport::StopBits::One;

/// Parity configuration
pub const PARITY: serialport::Parity = serialport::Parity::None;

/// Default interval between status polls
pub const POLL_INTERVAL_MS: u64 = 1000;
