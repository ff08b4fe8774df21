//! Configure Example
//!
//! This example loads a TOML profile and writes it to a BMS:
//! - Listing and selecting serial ports
//! - Converting physical units to the device's byte encoding
//! - Reviewing the encoded record before sending
//! - Debug output for link analysis
//!
//! Usage:
//!   cargo run --example configure                                   # Interactive mode
//!   cargo run --example configure -- COM3 profiles/default.toml
//!   cargo run --example configure -- /dev/ttyUSB0 my_pack.toml
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example configure

use bms_config::{format_config, BmsLink, ConfigProfile, OutputFormat, Result};
use inquire::{Confirm, Select};
use log::{error, info};

const DEFAULT_PROFILE: &str = "profiles/default.toml";

fn prompt_error(e: inquire::InquireError) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Selection cancelled: {}", e),
    )
}

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = BmsLink::list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(prompt_error)?;

    // Extract just the port name (before " - ")
    let port_name = selection
        .split(" - ")
        .next()
        .unwrap_or(&selection)
        .to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG is not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let port_name = args.next().map(Ok).unwrap_or_else(select_port)?;
    let profile_path = args.next().unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    info!("Loading profile {}", profile_path);
    let profile = ConfigProfile::load(&profile_path)?;

    let config = match profile.to_record() {
        Ok(config) => config,
        Err(e) => {
            error!("Profile cannot be encoded: {}", e);
            return Err(e);
        }
    };

    info!("=== Encoded Configuration ===");
    println!("{}", format_config(&config, OutputFormat::Label));

    let send = Confirm::new("Write this configuration to the BMS?")
        .with_default(false)
        .prompt()
        .map_err(prompt_error)?;
    if !send {
        info!("Nothing written");
        return Ok(());
    }

    info!("Connecting to BMS on {}...", port_name);
    let mut link = BmsLink::open(&port_name)?;

    // Enable debug printing to see the bytes on the wire
    link.set_debug_print(true, true);
    link.clear_input()?;
    link.write_config(&config)?;

    info!("=== Configure Complete ===");
    Ok(())
}
