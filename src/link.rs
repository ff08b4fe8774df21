use crate::codec::Record;
use crate::constants::*;
use crate::error::{BmsError, Result};
use crate::report::format_status;
use crate::types::*;
use chrono::Utc;
use log::{debug, info, trace, warn};
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

/// Ports that can drop whatever input is still buffered.
pub trait DiscardInput {
    fn discard_input(&mut self) -> Result<()>;
}

impl DiscardInput for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> Result<()> {
        self.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}

/// Byte-stream link to a BMS unit.
///
/// The link moves whole records and nothing else: a write sends the
/// encoded bytes of one record, a read consumes exactly one record's width.
/// With no framing on the wire, a read that fails partway leaves the stream
/// out of step; the link then refuses reads with [`BmsError::Desynced`]
/// until input is cleared or [`BmsLink::resync`] is called.
pub struct BmsLink<P = Box<dyn SerialPort>> {
    port: P,
    print_tx: bool,
    print_rx: bool,
    desynced: bool,
}

impl BmsLink<Box<dyn SerialPort>> {
    /// Open a serial link at the default baud rate
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with(port_name, BAUD_RATE)
    }

    /// Open a serial link at a specific baud rate
    pub fn open_with(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .data_bits(DATA_BITS)
            .stop_bits(STOP_BITS)
            .parity(PARITY)
            .open()?;

        info!("Opened {} at {} baud", port_name, baud_rate);
        Ok(Self::from_port(port))
    }

    /// List available serial ports
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }
}

impl<P: Read + Write + DiscardInput> BmsLink<P> {
    /// Discard any bytes buffered on the input side and accept reads again
    pub fn clear_input(&mut self) -> Result<()> {
        self.port.discard_input()?;
        self.desynced = false;
        Ok(())
    }

    /// Read one record, clearing pending input if the read fails.
    ///
    /// The error is still returned; the next read starts on fresh bytes.
    pub fn read_record_or_flush<R: Record>(&mut self) -> Result<R> {
        match self.read_record() {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!("{} read failed ({}), clearing input", R::NAME, e);
                self.clear_input()?;
                Err(e)
            }
        }
    }

    /// Read one status record, clearing pending input if the read fails
    pub fn read_status_or_flush(&mut self) -> Result<StatusRecord> {
        self.read_record_or_flush()
    }
}

impl<P: Read + Write> BmsLink<P> {
    /// Wrap an already open port or stream
    pub fn from_port(port: P) -> Self {
        BmsLink {
            port,
            print_tx: false,
            print_rx: false,
            desynced: false,
        }
    }

    /// Release the underlying port
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Enable/disable debug logging of TX/RX bytes
    pub fn set_debug_print(&mut self, tx: bool, rx: bool) {
        self.print_tx = tx;
        self.print_rx = rx;
    }

    /// Whether a failed read left the stream out of step
    pub fn is_desynced(&self) -> bool {
        self.desynced
    }

    /// Accept reads again after the caller has realigned the stream
    pub fn resync(&mut self) {
        self.desynced = false;
    }

    fn hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Send raw bytes to the BMS
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.print_tx {
            debug!("Sending:  {}", Self::hex(bytes));
        }

        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// Read exactly `len` bytes from the BMS
    fn receive(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.desynced {
            return Err(BmsError::Desynced);
        }

        let mut response = vec![0u8; len];
        if let Err(e) = self.port.read_exact(&mut response) {
            // Bytes consumed by the failed read are lost
            self.desynced = true;
            return Err(match e.kind() {
                ErrorKind::TimedOut => BmsError::Timeout,
                _ => BmsError::Io(e),
            });
        }

        if self.print_rx {
            debug!("Received: {}", Self::hex(&response));
        }

        Ok(response)
    }

    /// Encode and send any record
    pub fn write_record<R: Record>(&mut self, record: &R) -> Result<()> {
        let bytes = record.encode();
        trace!("Writing {} record ({} bytes)", R::NAME, bytes.len());
        self.send(&bytes)
    }

    /// Read and decode one record
    pub fn read_record<R: Record>(&mut self) -> Result<R> {
        let bytes = self.receive(R::LEN)?;
        trace!("Read {} record ({} bytes)", R::NAME, bytes.len());
        R::decode(&bytes)
    }

    /// Send a configuration record to the BMS
    pub fn write_config(&mut self, config: &ConfigRecord) -> Result<()> {
        if !config.is_valid() {
            warn!("Writing a configuration that is not marked valid");
        }
        self.write_record(config)?;
        info!("Configuration written");
        Ok(())
    }

    /// Read one status record from the BMS
    pub fn read_status(&mut self) -> Result<StatusRecord> {
        self.read_record()
    }

    /// Read one status record and stamp it with the current time
    pub fn snapshot(&mut self) -> Result<StatusSnapshot> {
        let status = self.read_status()?;
        Ok(StatusSnapshot {
            timestamp: Utc::now(),
            status,
        })
    }

    /// Read `count` snapshots, waiting `interval` between reads
    pub fn poll_status(&mut self, count: usize, interval: Duration) -> Result<Vec<StatusSnapshot>> {
        let mut snapshots = Vec::with_capacity(count);

        for i in 0..count {
            if i > 0 {
                thread::sleep(interval);
            }
            snapshots.push(self.snapshot()?);
        }

        Ok(snapshots)
    }

    /// Read a snapshot and print it in the requested format
    pub fn print_status(&mut self, format: OutputFormat) -> Result<StatusSnapshot> {
        let snapshot = self.snapshot()?;
        println!("{}", snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"));
        println!("{}", format_status(&snapshot.status, format));
        Ok(snapshot)
    }
}
