//! Monitor Example
//!
//! This example polls status snapshots from a BMS. It includes:
//! - Interactive serial port selection (or command-line argument)
//! - Formatted status output
//! - Structured snapshot data with JSON export
//!
//! Usage:
//!   cargo run --example monitor              # Interactive mode
//!   cargo run --example monitor -- COM3      # Specify port
//!   cargo run --example monitor -- /dev/ttyUSB0 10
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example monitor
//!   RUST_LOG=info cargo run --example monitor

use bms_config::constants::POLL_INTERVAL_MS;
use bms_config::{BmsLink, OutputFormat, Result};
use inquire::Select;
use log::{error, info};
use std::time::Duration;

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
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

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
    let count: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(5);

    info!("Connecting to BMS on {}...", port_name);
    let mut link = BmsLink::open(&port_name)?;
    link.clear_input()?;

    info!("=== BMS Status ===");
    match link.print_status(OutputFormat::Label) {
        Ok(_) => info!("=== Status Complete ==="),
        Err(e) => {
            error!("Failed to read status: {}", e);
            error!("Check that:");
            error!("1. The BMS is powered and connected");
            error!("2. Correct serial port is specified");
            error!("3. The baud rate matches the firmware");

            // Drop the partial record before polling the same stream
            link.clear_input()?;
        }
    }

    info!("=== Structured Status Data ({} samples) ===", count);
    match link.poll_status(count, Duration::from_millis(POLL_INTERVAL_MS)) {
        Ok(snapshots) => {
            for snapshot in &snapshots {
                info!(
                    "{}  SOC {}%  V {}  I {}  aux {:.2}V  T {}  status {} error {}",
                    snapshot.timestamp.format("%H:%M:%S"),
                    snapshot.status.soc,
                    snapshot.status.voltage,
                    snapshot.status.current,
                    snapshot.status.aux_voltage,
                    snapshot.status.temperature,
                    snapshot.status.status,
                    snapshot.status.error,
                );
            }

            if let Ok(json) = serde_json::to_string_pretty(&snapshots) {
                info!("JSON Export:");
                info!("{}", json);
            }
        }
        Err(e) => {
            error!("Failed to poll status: {}", e);
        }
    }

    Ok(())
}
