use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::Result;

/// Calibration and threshold parameters sent to a BMS unit.
///
/// Every field is held as the raw byte that goes on the wire. Fields with a
/// documented decode scale get a physical getter and a fallible physical
/// setter next to the raw pair, so the scale is applied in one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConfigRecord {
    pub(crate) valid: bool,

    pub(crate) pack_capacity: u8,
    pub(crate) soc_warn_thresh: u8,
    pub(crate) full_voltage: u8,
    pub(crate) current_warn_thresh: u8,
    pub(crate) overcurrent_thresh: u8,
    pub(crate) overtemperature_thresh: u8,
    pub(crate) min_aux_voltage: u8,
    pub(crate) max_leakage: u8,

    pub(crate) tacho_pulses_per_rev: u8,
    pub(crate) fuel_gauge_full: u8,
    pub(crate) fuel_gauge_empty: u8,
    pub(crate) temp_gauge_hot: u8,
    pub(crate) temp_gauge_cold: u8,
    pub(crate) peukerts_exponent: u8,
    pub(crate) enable_precharge: bool,
    pub(crate) enable_contactor_aux_sw: bool,

    pub(crate) bms_min_cell_voltage: u8,
    pub(crate) bms_max_cell_voltage: u8,
    pub(crate) bms_shunt_voltage: u8,
    pub(crate) low_temperature_warn: u8,
    pub(crate) high_temperature_warn: u8,
}

/// Generates raw getter/setter pairs for fields without a decode scale.
macro_rules! raw_fields {
    ($( $(#[$doc:meta])* $field:ident / $setter:ident; )*) => {
        impl ConfigRecord {
            $(
                $(#[$doc])*
                pub fn $field(&self) -> u8 {
                    self.$field
                }

                #[doc = concat!("Set `", stringify!($field), "` as a raw byte.")]
                pub fn $setter(&mut self, raw: u8) {
                    self.$field = raw;
                }
            )*
        }
    };
}

/// Generates raw and physical accessors for scaled fields.
macro_rules! scaled_fields {
    ($( $(#[$doc:meta])* $field:ident: $scale:expr => $raw:ident / $set_raw:ident / $setter:ident; )*) => {
        impl ConfigRecord {
            $(
                $(#[$doc])*
                pub fn $field(&self) -> f64 {
                    $scale.decode(self.$field)
                }

                #[doc = concat!("Raw byte of `", stringify!($field), "`.")]
                pub fn $raw(&self) -> u8 {
                    self.$field
                }

                #[doc = concat!("Set `", stringify!($field), "` as a raw byte.")]
                pub fn $set_raw(&mut self, raw: u8) {
                    self.$field = raw;
                }

                #[doc = concat!("Set `", stringify!($field), "` in physical units, rounded to the nearest step.")]
                pub fn $setter(&mut self, value: f64) -> Result<()> {
                    self.$field = $scale.encode(stringify!($field), value)?;
                    Ok(())
                }
            )*
        }
    };
}

raw_fields! {
    /// Pack capacity
    pack_capacity / set_pack_capacity;
    /// State of charge warning threshold
    soc_warn_thresh / set_soc_warn_thresh;
    /// Overtemperature threshold
    overtemperature_thresh / set_overtemperature_thresh;
    /// Minimum auxiliary voltage
    min_aux_voltage / set_min_aux_voltage;
    /// Maximum leakage
    max_leakage / set_max_leakage;
    /// Tachometer pulses per revolution
    tacho_pulses_per_rev / set_tacho_pulses_per_rev;
    /// Fuel gauge output at full charge
    fuel_gauge_full / set_fuel_gauge_full;
    /// Fuel gauge output at empty
    fuel_gauge_empty / set_fuel_gauge_empty;
    /// Temperature gauge output when hot
    temp_gauge_hot / set_temp_gauge_hot;
    /// Temperature gauge output when cold
    temp_gauge_cold / set_temp_gauge_cold;
    /// Cell low temperature warning
    low_temperature_warn / set_low_temperature_warn;
    /// Cell high temperature warning
    high_temperature_warn / set_high_temperature_warn;
}

scaled_fields! {
    /// Full pack voltage in volts (raw × 2)
    full_voltage: FULL_VOLTAGE_SCALE => full_voltage_raw / set_full_voltage_raw / set_full_voltage;
    /// Current warning threshold in amps (raw × 10)
    current_warn_thresh: CURRENT_SCALE => current_warn_thresh_raw / set_current_warn_thresh_raw / set_current_warn_thresh;
    /// Overcurrent threshold in amps (raw × 10)
    overcurrent_thresh: CURRENT_SCALE => overcurrent_thresh_raw / set_overcurrent_thresh_raw / set_overcurrent_thresh;
    /// Peukert's exponent (raw ÷ 10)
    peukerts_exponent: PEUKERT_SCALE => peukerts_exponent_raw / set_peukerts_exponent_raw / set_peukerts_exponent;
    /// Minimum cell voltage in volts (raw × 0.05)
    bms_min_cell_voltage: CELL_VOLTAGE_SCALE => bms_min_cell_voltage_raw / set_bms_min_cell_voltage_raw / set_bms_min_cell_voltage;
    /// Maximum cell voltage in volts (raw × 0.05)
    bms_max_cell_voltage: CELL_VOLTAGE_SCALE => bms_max_cell_voltage_raw / set_bms_max_cell_voltage_raw / set_bms_max_cell_voltage;
    /// Cell shunt voltage in volts (raw × 0.05)
    bms_shunt_voltage: CELL_VOLTAGE_SCALE => bms_shunt_voltage_raw / set_bms_shunt_voltage_raw / set_bms_shunt_voltage;
}

impl ConfigRecord {
    /// Whether the record holds a committed configuration
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the record as committed (or not)
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Whether precharge is enabled
    pub fn precharge_enabled(&self) -> bool {
        self.enable_precharge
    }

    /// Enable or disable precharge
    pub fn set_precharge_enabled(&mut self, enabled: bool) {
        self.enable_precharge = enabled;
    }

    /// Whether the contactor auxiliary switch is enabled
    pub fn contactor_aux_sw_enabled(&self) -> bool {
        self.enable_contactor_aux_sw
    }

    /// Enable or disable the contactor auxiliary switch
    pub fn set_contactor_aux_sw_enabled(&mut self, enabled: bool) {
        self.enable_contactor_aux_sw = enabled;
    }
}

/// Live telemetry read from a BMS unit.
///
/// `status` and `error` are device-defined codes. The integer telemetry
/// fields carry whatever scale the firmware uses; `soc` is a percentage
/// by convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: u8,
    pub error: u8,
    pub soc: i32,
    pub voltage: i32,
    pub current: i32,
    pub aux_voltage: f32,
    pub temperature: i32,
}

/// Status record stamped with the host time it was read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub timestamp: DateTime<Utc>,
    pub status: StatusRecord,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Label,
    Raw,
    Array,
}
