//! Fixed-layout binary codec for the configuration and status records.
//!
//! Configuration layout: 22 single bytes in declaration order. Flags are
//! written as 1/0. `valid` reads back as true only for exactly 1, so blank
//! (0x00) and erased (0xFF) memory both decode as uncommitted. The enable
//! flags read back as "nonzero is true".
//!
//! Status layout (little-endian, 22 bytes):
//!
//! | offset | field       | type |
//! |--------|-------------|------|
//! | 0      | status      | u8   |
//! | 1      | error       | u8   |
//! | 2      | soc         | i32  |
//! | 6      | voltage     | i32  |
//! | 10     | current     | i32  |
//! | 14     | aux_voltage | f32  |
//! | 18     | temperature | i32  |

use crate::constants::{CONFIG_RECORD_LEN, STATUS_RECORD_LEN};
use crate::error::{BmsError, Result};
use crate::types::{ConfigRecord, StatusRecord};

/// A record with a fixed-width wire encoding.
pub trait Record: Sized {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Encoded width in bytes
    const LEN: usize;

    /// Encode into exactly [`Record::LEN`] bytes
    fn encode(&self) -> Vec<u8>;

    /// Decode from exactly [`Record::LEN`] bytes
    fn decode(bytes: &[u8]) -> Result<Self>;
}

fn check_len<R: Record>(bytes: &[u8]) -> Result<()> {
    if bytes.len() != R::LEN {
        return Err(BmsError::MalformedRecord {
            record: R::NAME,
            expected: R::LEN,
            actual: bytes.len(),
        });
    }
    Ok(())
}

impl Record for ConfigRecord {
    const NAME: &'static str = "config";
    const LEN: usize = CONFIG_RECORD_LEN;

    fn encode(&self) -> Vec<u8> {
        vec![
            self.valid as u8,
            self.pack_capacity,
            self.soc_warn_thresh,
            self.full_voltage,
            self.current_warn_thresh,
            self.overcurrent_thresh,
            self.overtemperature_thresh,
            self.min_aux_voltage,
            self.max_leakage,
            self.tacho_pulses_per_rev,
            self.fuel_gauge_full,
            self.fuel_gauge_empty,
            self.temp_gauge_hot,
            self.temp_gauge_cold,
            self.peukerts_exponent,
            self.enable_precharge as u8,
            self.enable_contactor_aux_sw as u8,
            self.bms_min_cell_voltage,
            self.bms_max_cell_voltage,
            self.bms_shunt_voltage,
            self.low_temperature_warn,
            self.high_temperature_warn,
        ]
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        check_len::<Self>(bytes)?;

        Ok(ConfigRecord {
            valid: bytes[0] == 1,
            pack_capacity: bytes[1],
            soc_warn_thresh: bytes[2],
            full_voltage: bytes[3],
            current_warn_thresh: bytes[4],
            overcurrent_thresh: bytes[5],
            overtemperature_thresh: bytes[6],
            min_aux_voltage: bytes[7],
            max_leakage: bytes[8],
            tacho_pulses_per_rev: bytes[9],
            fuel_gauge_full: bytes[10],
            fuel_gauge_empty: bytes[11],
            temp_gauge_hot: bytes[12],
            temp_gauge_cold: bytes[13],
            peukerts_exponent: bytes[14],
            enable_precharge: bytes[15] != 0,
            enable_contactor_aux_sw: bytes[16] != 0,
            bms_min_cell_voltage: bytes[17],
            bms_max_cell_voltage: bytes[18],
            bms_shunt_voltage: bytes[19],
            low_temperature_warn: bytes[20],
            high_temperature_warn: bytes[21],
        })
    }
}

/// Four bytes at `offset`; caller has checked the length
fn word(bytes: &[u8], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}

impl Record for StatusRecord {
    const NAME: &'static str = "status";
    const LEN: usize = STATUS_RECORD_LEN;

    fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::LEN);
        bytes.push(self.status);
        bytes.push(self.error);
        bytes.extend_from_slice(&self.soc.to_le_bytes());
        bytes.extend_from_slice(&self.voltage.to_le_bytes());
        bytes.extend_from_slice(&self.current.to_le_bytes());
        bytes.extend_from_slice(&self.aux_voltage.to_le_bytes());
        bytes.extend_from_slice(&self.temperature.to_le_bytes());
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        check_len::<Self>(bytes)?;

        Ok(StatusRecord {
            status: bytes[0],
            error: bytes[1],
            soc: i32::from_le_bytes(word(bytes, 2)),
            voltage: i32::from_le_bytes(word(bytes, 6)),
            current: i32::from_le_bytes(word(bytes, 10)),
            aux_voltage: f32::from_le_bytes(word(bytes, 14)),
            temperature: i32::from_le_bytes(word(bytes, 18)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_config() -> ConfigRecord {
        let mut config = ConfigRecord::default();
        config.set_valid(true);
        config.set_pack_capacity(100);
        config.set_full_voltage_raw(74);
        config.set_overcurrent_thresh_raw(30);
        config.set_precharge_enabled(true);
        config.set_bms_min_cell_voltage_raw(60);
        config.set_high_temperature_warn(65);
        config
    }

    #[test]
    fn test_config_layout() {
        let bytes = sample_config().encode();

        assert_eq!(bytes.len(), CONFIG_RECORD_LEN);
        assert_eq!(bytes[0], 1); // valid
        assert_eq!(bytes[1], 100); // pack_capacity
        assert_eq!(bytes[3], 74); // full_voltage
        assert_eq!(bytes[5], 30); // overcurrent_thresh
        assert_eq!(bytes[15], 1); // enable_precharge
        assert_eq!(bytes[16], 0); // enable_contactor_aux_sw
        assert_eq!(bytes[17], 60); // bms_min_cell_voltage
        assert_eq!(bytes[21], 65); // high_temperature_warn
    }

    #[test]
    fn test_config_decode_scales() {
        let mut bytes = vec![0u8; CONFIG_RECORD_LEN];
        bytes[3] = 74;
        bytes[17] = 60;

        let config = ConfigRecord::decode(&bytes).unwrap();
        assert_eq!(config.full_voltage(), 148.0);
        assert_eq!(config.bms_min_cell_voltage(), 3.0);
    }

    #[test]
    fn test_config_boundary_bytes() {
        let zeros = ConfigRecord::decode(&[0u8; CONFIG_RECORD_LEN]).unwrap();
        assert_eq!(zeros, ConfigRecord::default());
        assert_eq!(zeros.encode(), vec![0u8; CONFIG_RECORD_LEN]);

        let erased = ConfigRecord::decode(&[0xFF; CONFIG_RECORD_LEN]).unwrap();
        assert!(!erased.is_valid());
        assert!(erased.precharge_enabled());
        assert_eq!(erased.bms_shunt_voltage(), 12.75);

        // Flags normalize to 1/0 on the way back out
        let reencoded = erased.encode();
        assert_eq!(reencoded[0], 0);
        assert_eq!(reencoded[15], 1);
        assert_eq!(reencoded[1], 0xFF);
    }

    #[test]
    fn test_valid_requires_exactly_one() {
        let mut bytes = sample_config().encode();

        for (byte, committed) in [(0x00, false), (0x01, true), (0x02, false), (0xFF, false)] {
            bytes[0] = byte;
            let config = ConfigRecord::decode(&bytes).unwrap();
            assert_eq!(config.is_valid(), committed, "valid byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_config_malformed() {
        match ConfigRecord::decode(&[0u8; CONFIG_RECORD_LEN - 1]) {
            Err(BmsError::MalformedRecord {
                record,
                expected,
                actual,
            }) => {
                assert_eq!(record, "config");
                assert_eq!(expected, 22);
                assert_eq!(actual, 21);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }

        assert!(ConfigRecord::decode(&[]).is_err());
        assert!(ConfigRecord::decode(&[0u8; CONFIG_RECORD_LEN + 1]).is_err());
    }

    #[test]
    fn test_status_layout() {
        let status = StatusRecord {
            status: 2,
            error: 0x10,
            soc: 87,
            voltage: 1480,
            current: -25,
            aux_voltage: 12.5,
            temperature: 31,
        };
        let bytes = status.encode();

        assert_eq!(bytes.len(), STATUS_RECORD_LEN);
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[1], 0x10);
        assert_eq!(&bytes[2..6], &[87, 0, 0, 0]);
        assert_eq!(&bytes[6..10], &[0xC8, 0x05, 0, 0]);
        assert_eq!(&bytes[10..14], &[0xE7, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[14..18], &12.5f32.to_le_bytes());
        assert_eq!(&bytes[18..22], &[31, 0, 0, 0]);

        assert_eq!(StatusRecord::decode(&bytes).unwrap(), status);
    }

    #[test]
    fn test_status_boundary_bytes() {
        let zeros = StatusRecord::decode(&[0u8; STATUS_RECORD_LEN]).unwrap();
        assert_eq!(zeros, StatusRecord::default());

        let ones = StatusRecord::decode(&[0xFF; STATUS_RECORD_LEN]).unwrap();
        assert_eq!(ones.status, 255);
        assert_eq!(ones.soc, -1);
        assert!(ones.aux_voltage.is_nan());
        assert_eq!(ones.encode(), vec![0xFF; STATUS_RECORD_LEN]);
    }

    #[test]
    fn test_status_malformed() {
        let result = StatusRecord::decode(&[0u8; 8]);
        assert!(matches!(
            result,
            Err(BmsError::MalformedRecord {
                record: "status",
                expected: STATUS_RECORD_LEN,
                actual: 8,
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_config_roundtrip(bytes in proptest::collection::vec(any::<u8>(), CONFIG_RECORD_LEN)) {
            let config = ConfigRecord::decode(&bytes).unwrap();
            prop_assert_eq!(ConfigRecord::decode(&config.encode()).unwrap(), config);
        }

        #[test]
        fn prop_status_roundtrip(bytes in proptest::collection::vec(any::<u8>(), STATUS_RECORD_LEN)) {
            // Compared as bytes so NaN payloads in aux_voltage count too
            let status = StatusRecord::decode(&bytes).unwrap();
            prop_assert_eq!(status.encode(), bytes);
        }

        #[test]
        fn prop_status_record_roundtrip(
            status in any::<u8>(),
            error in any::<u8>(),
            soc in any::<i32>(),
            voltage in any::<i32>(),
            current in any::<i32>(),
            aux_voltage in -1.0e6f32..1.0e6f32,
            temperature in any::<i32>(),
        ) {
            let record = StatusRecord { status, error, soc, voltage, current, aux_voltage, temperature };
            prop_assert_eq!(StatusRecord::decode(&record.encode()).unwrap(), record);
        }
    }
}
