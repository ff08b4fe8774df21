//! # BMS Config Library
//!
//! A Rust library for configuring and monitoring a Battery Management System
//! over a serial link. It defines the fixed binary layout of the BMS
//! configuration and status records and the decode scales of the
//! byte-packed calibration fields.
//!
//! ## Features
//!
//! - Encode/decode the 22-byte configuration and status records
//! - Typed raw and physical-unit accessors for scaled fields (×2, ×10, ÷10, ×0.05 V)
//! - Edit configurations as TOML profiles in physical units
//! - Write configurations and read timestamped status snapshots over serial
//!
//! ## Example
//!
//! ```no_run
//! use bms_config::{BmsLink, ConfigProfile};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let profile = ConfigProfile::load("profiles/default.toml")?;
//!     let mut link = BmsLink::open("/dev/ttyUSB0")?;
//!     link.write_config(&profile.to_record()?)?;
//!     let status = link.read_status()?;
//!     println!("SOC: {}%", status.soc);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod constants;
pub mod error;
pub mod link;
pub mod profile;
pub mod report;
pub mod scale;
pub mod types;

pub use codec::Record;
pub use error::{BmsError, Result};
pub use link::BmsLink;
pub use profile::ConfigProfile;
pub use report::{format_config, format_status};
pub use scale::Scale;
pub use types::*;
