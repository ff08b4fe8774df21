//! Text rendering of configuration and status records.

use crate::codec::Record;
use crate::types::{ConfigRecord, OutputFormat, StatusRecord};

/// One configuration field: name, raw byte, decoded value with unit
fn config_rows(config: &ConfigRecord) -> Vec<(&'static str, u8, String)> {
    let flag = |on: bool| (if on { "on" } else { "off" }).to_string();

    vec![
        ("valid", config.is_valid() as u8, flag(config.is_valid())),
        ("pack_capacity", config.pack_capacity(), config.pack_capacity().to_string()),
        ("soc_warn_thresh", config.soc_warn_thresh(), config.soc_warn_thresh().to_string()),
        ("full_voltage", config.full_voltage_raw(), format!("{:.1} V", config.full_voltage())),
        (
            "current_warn_thresh",
            config.current_warn_thresh_raw(),
            format!("{:.0} A", config.current_warn_thresh()),
        ),
        (
            "overcurrent_thresh",
            config.overcurrent_thresh_raw(),
            format!("{:.0} A", config.overcurrent_thresh()),
        ),
        (
            "overtemperature_thresh",
            config.overtemperature_thresh(),
            config.overtemperature_thresh().to_string(),
        ),
        ("min_aux_voltage", config.min_aux_voltage(), config.min_aux_voltage().to_string()),
        ("max_leakage", config.max_leakage(), config.max_leakage().to_string()),
        (
            "tacho_pulses_per_rev",
            config.tacho_pulses_per_rev(),
            config.tacho_pulses_per_rev().to_string(),
        ),
        ("fuel_gauge_full", config.fuel_gauge_full(), config.fuel_gauge_full().to_string()),
        ("fuel_gauge_empty", config.fuel_gauge_empty(), config.fuel_gauge_empty().to_string()),
        ("temp_gauge_hot", config.temp_gauge_hot(), config.temp_gauge_hot().to_string()),
        ("temp_gauge_cold", config.temp_gauge_cold(), config.temp_gauge_cold().to_string()),
        (
            "peukerts_exponent",
            config.peukerts_exponent_raw(),
            format!("{:.1}", config.peukerts_exponent()),
        ),
        (
            "enable_precharge",
            config.precharge_enabled() as u8,
            flag(config.precharge_enabled()),
        ),
        (
            "enable_contactor_aux_sw",
            config.contactor_aux_sw_enabled() as u8,
            flag(config.contactor_aux_sw_enabled()),
        ),
        (
            "bms_min_cell_voltage",
            config.bms_min_cell_voltage_raw(),
            format!("{:.2} V", config.bms_min_cell_voltage()),
        ),
        (
            "bms_max_cell_voltage",
            config.bms_max_cell_voltage_raw(),
            format!("{:.2} V", config.bms_max_cell_voltage()),
        ),
        (
            "bms_shunt_voltage",
            config.bms_shunt_voltage_raw(),
            format!("{:.2} V", config.bms_shunt_voltage()),
        ),
        (
            "low_temperature_warn",
            config.low_temperature_warn(),
            config.low_temperature_warn().to_string(),
        ),
        (
            "high_temperature_warn",
            config.high_temperature_warn(),
            config.high_temperature_warn().to_string(),
        ),
    ]
}

/// Format a configuration record for display
pub fn format_config(config: &ConfigRecord, format: OutputFormat) -> String {
    match format {
        OutputFormat::Label => {
            let mut lines = vec!["ID  FIELD                    RAW VALUE".to_string()];
            for (id, (name, raw, value)) in config_rows(config).into_iter().enumerate() {
                lines.push(format!("{:2}  {:<24} {:3} {}", id, name, raw, value));
            }
            lines.join("\n")
        }
        OutputFormat::Raw => config
            .encode()
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Array => format!("{:?}", config.encode()),
    }
}

/// Format a status record for display
pub fn format_status(status: &StatusRecord, format: OutputFormat) -> String {
    match format {
        OutputFormat::Label => [
            format!("Status: {}", status.status),
            format!("Error: {:#04x}", status.error),
            format!("SOC: {}%", status.soc),
            format!("Voltage: {}", status.voltage),
            format!("Current: {}", status.current),
            format!("Aux voltage: {:.2}V", status.aux_voltage),
            format!("Temperature: {}", status.temperature),
        ]
        .join("\n"),
        OutputFormat::Raw => [
            status.status.to_string(),
            status.error.to_string(),
            status.soc.to_string(),
            status.voltage.to_string(),
            status.current.to_string(),
            format!("{:.2}", status.aux_voltage),
            status.temperature.to_string(),
        ]
        .join("\n"),
        OutputFormat::Array => format!("{:?}", status.encode()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONFIG_RECORD_LEN;

    #[test]
    fn test_config_label_lists_every_field() {
        let mut config = ConfigRecord::default();
        config.set_full_voltage_raw(74);
        config.set_bms_min_cell_voltage_raw(60);

        let text = format_config(&config, OutputFormat::Label);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), CONFIG_RECORD_LEN + 1);
        assert!(lines[4].contains("full_voltage"));
        assert!(lines[4].ends_with(" 74 148.0 V"));
        assert!(lines[18].contains("bms_min_cell_voltage"));
        assert!(lines[18].ends_with("3.00 V"));
    }

    #[test]
    fn test_config_raw_matches_encoding() {
        let mut config = ConfigRecord::default();
        config.set_valid(true);
        config.set_pack_capacity(42);

        let text = format_config(&config, OutputFormat::Raw);
        let bytes: Vec<u8> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(bytes, config.encode());
    }

    #[test]
    fn test_status_label() {
        let status = StatusRecord {
            status: 3,
            error: 0x21,
            soc: 64,
            voltage: 1502,
            current: -40,
            aux_voltage: 12.6,
            temperature: 35,
        };

        let text = format_status(&status, OutputFormat::Label);
        assert!(text.contains("Error: 0x21"));
        assert!(text.contains("SOC: 64%"));
        assert!(text.contains("Current: -40"));
        assert!(text.contains("Aux voltage: 12.60V"));
    }
}
