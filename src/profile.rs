//! Configuration profiles in physical units.
//!
//! A profile is the host-side, human-edited form of a [`ConfigRecord`]:
//! volts, amps and the Peukert exponent are written as decimals and
//! converted through the field scales when the record is built.
//!
//! ```toml
//! [pack]
//! capacity = 100
//! full_voltage = 148.0
//! # ...
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ConfigRecord;

/// Complete BMS configuration in physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigProfile {
    pub pack: PackSettings,
    pub gauges: GaugeSettings,
    pub cells: CellSettings,
}

/// Pack-level thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackSettings {
    pub capacity: u8,
    pub soc_warn_thresh: u8,
    /// Volts, in steps of 2
    pub full_voltage: f64,
    /// Amps, in steps of 10
    pub current_warn_thresh: f64,
    /// Amps, in steps of 10
    pub overcurrent_thresh: f64,
    pub overtemperature_thresh: u8,
    pub min_aux_voltage: u8,
    pub max_leakage: u8,
}

/// Dashboard gauges, sensors and switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeSettings {
    pub tacho_pulses_per_rev: u8,
    pub fuel_gauge_full: u8,
    pub fuel_gauge_empty: u8,
    pub temp_gauge_hot: u8,
    pub temp_gauge_cold: u8,
    /// In steps of 0.1
    pub peukerts_exponent: f64,
    pub enable_precharge: bool,
    pub enable_contactor_aux_sw: bool,
}

/// Cell-level thresholds, volts in steps of 0.05
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellSettings {
    pub min_voltage: f64,
    pub max_voltage: f64,
    pub shunt_voltage: f64,
    pub low_temperature_warn: u8,
    pub high_temperature_warn: u8,
}

impl ConfigProfile {
    /// Parse a profile from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Render the profile as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a profile from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading profile from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Save the profile to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?)?;
        info!("Saved profile to {}", path.display());
        Ok(())
    }

    /// Build a committed configuration record.
    ///
    /// Fails with [`crate::BmsError::OutOfRange`] on the first scaled
    /// value that does not fit its byte.
    pub fn to_record(&self) -> Result<ConfigRecord> {
        let mut config = ConfigRecord::default();
        config.set_valid(true);

        let pack = &self.pack;
        config.set_pack_capacity(pack.capacity);
        config.set_soc_warn_thresh(pack.soc_warn_thresh);
        config.set_full_voltage(pack.full_voltage)?;
        config.set_current_warn_thresh(pack.current_warn_thresh)?;
        config.set_overcurrent_thresh(pack.overcurrent_thresh)?;
        config.set_overtemperature_thresh(pack.overtemperature_thresh);
        config.set_min_aux_voltage(pack.min_aux_voltage);
        config.set_max_leakage(pack.max_leakage);

        let gauges = &self.gauges;
        config.set_tacho_pulses_per_rev(gauges.tacho_pulses_per_rev);
        config.set_fuel_gauge_full(gauges.fuel_gauge_full);
        config.set_fuel_gauge_empty(gauges.fuel_gauge_empty);
        config.set_temp_gauge_hot(gauges.temp_gauge_hot);
        config.set_temp_gauge_cold(gauges.temp_gauge_cold);
        config.set_peukerts_exponent(gauges.peukerts_exponent)?;
        config.set_precharge_enabled(gauges.enable_precharge);
        config.set_contactor_aux_sw_enabled(gauges.enable_contactor_aux_sw);

        let cells = &self.cells;
        config.set_bms_min_cell_voltage(cells.min_voltage)?;
        config.set_bms_max_cell_voltage(cells.max_voltage)?;
        config.set_bms_shunt_voltage(cells.shunt_voltage)?;
        config.set_low_temperature_warn(cells.low_temperature_warn);
        config.set_high_temperature_warn(cells.high_temperature_warn);

        Ok(config)
    }

    /// Decode every field of a record into physical units
    pub fn from_record(config: &ConfigRecord) -> Self {
        ConfigProfile {
            pack: PackSettings {
                capacity: config.pack_capacity(),
                soc_warn_thresh: config.soc_warn_thresh(),
                full_voltage: config.full_voltage(),
                current_warn_thresh: config.current_warn_thresh(),
                overcurrent_thresh: config.overcurrent_thresh(),
                overtemperature_thresh: config.overtemperature_thresh(),
                min_aux_voltage: config.min_aux_voltage(),
                max_leakage: config.max_leakage(),
            },
            gauges: GaugeSettings {
                tacho_pulses_per_rev: config.tacho_pulses_per_rev(),
                fuel_gauge_full: config.fuel_gauge_full(),
                fuel_gauge_empty: config.fuel_gauge_empty(),
                temp_gauge_hot: config.temp_gauge_hot(),
                temp_gauge_cold: config.temp_gauge_cold(),
                peukerts_exponent: config.peukerts_exponent(),
                enable_precharge: config.precharge_enabled(),
                enable_contactor_aux_sw: config.contactor_aux_sw_enabled(),
            },
            cells: CellSettings {
                min_voltage: config.bms_min_cell_voltage(),
                max_voltage: config.bms_max_cell_voltage(),
                shunt_voltage: config.bms_shunt_voltage(),
                low_temperature_warn: config.low_temperature_warn(),
                high_temperature_warn: config.high_temperature_warn(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Record;
    use crate::constants::CONFIG_RECORD_LEN;
    use crate::error::BmsError;

    const DEFAULT_PROFILE: &str = include_str!("../profiles/default.toml");

    #[test]
    fn test_default_profile_parses() {
        let profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        assert_eq!(profile.pack.full_voltage, 148.0);
        assert_eq!(profile.cells.min_voltage, 2.8);
        assert!(profile.gauges.enable_precharge);
    }

    #[test]
    fn test_to_record_applies_scales() {
        let profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        let config = profile.to_record().unwrap();

        assert!(config.is_valid());
        assert_eq!(config.full_voltage_raw(), 74);
        assert_eq!(config.overcurrent_thresh_raw(), 30);
        assert_eq!(config.peukerts_exponent_raw(), 11);
        assert_eq!(config.bms_min_cell_voltage_raw(), 56);
        assert_eq!(config.bms_max_cell_voltage_raw(), 72);
        assert_eq!(config.encode().len(), CONFIG_RECORD_LEN);
    }

    #[test]
    fn test_record_roundtrip_on_steps() {
        let profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        let config = profile.to_record().unwrap();
        assert_eq!(ConfigProfile::from_record(&config), profile);
    }

    #[test]
    fn test_out_of_range_names_field() {
        let mut profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        profile.cells.shunt_voltage = 13.0;

        match profile.to_record() {
            Err(BmsError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, "bms_shunt_voltage");
                assert_eq!(value, 13.0);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_and_missing_keys() {
        let unknown = DEFAULT_PROFILE.replace("[cells]", "[cells]\nbalance_current = 5");
        assert!(matches!(
            ConfigProfile::from_toml_str(&unknown),
            Err(BmsError::ProfileParse(_))
        ));

        let missing = DEFAULT_PROFILE.replace("capacity = 100", "");
        assert!(ConfigProfile::from_toml_str(&missing).is_err());
    }

    #[test]
    fn test_byte_fields_reject_wide_integers() {
        let wide = DEFAULT_PROFILE.replace("capacity = 100", "capacity = 300");
        assert!(ConfigProfile::from_toml_str(&wide).is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        let text = profile.to_toml_string().unwrap();
        assert_eq!(ConfigProfile::from_toml_str(&text).unwrap(), profile);
    }

    #[test]
    fn test_save_and_load() {
        let profile = ConfigProfile::from_toml_str(DEFAULT_PROFILE).unwrap();
        let path = std::env::temp_dir().join(format!("bms-profile-{}.toml", std::process::id()));

        profile.save(&path).unwrap();
        let loaded = ConfigProfile::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigProfile::load("/nonexistent/bms-profile.toml");
        assert!(matches!(result, Err(BmsError::Io(_))));
    }
}
