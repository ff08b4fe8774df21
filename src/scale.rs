//! Decode scales for byte-packed calibration fields.
//!
//! A scale is stored as a rational `numerator / denominator` so that steps
//! such as 0.05 V decode exactly (`60 / 20 == 3.0`) instead of picking up
//! binary floating point error from multiplying by `0.05`.

use crate::error::{BmsError, Result};

/// Conversion between a raw byte and a physical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    numerator: u16,
    denominator: u16,
}

impl Scale {
    /// Raw value stored as-is
    pub const IDENTITY: Scale = Scale::new(1, 1);

    /// Create a scale where `physical = raw * numerator / denominator`.
    ///
    /// Both terms must be nonzero; a zero in a `const` fails the build.
    pub(crate) const fn new(numerator: u16, denominator: u16) -> Self {
        assert!(numerator != 0 && denominator != 0, "scale terms must be nonzero");
        Self {
            numerator,
            denominator,
        }
    }

    /// Physical value of one raw step
    pub fn step(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Largest representable physical value
    pub fn max(&self) -> f64 {
        self.decode(u8::MAX)
    }

    /// Convert a raw byte to its physical value
    pub fn decode(&self, raw: u8) -> f64 {
        raw as f64 * self.numerator as f64 / self.denominator as f64
    }

    /// Convert a physical value to the nearest raw byte.
    ///
    /// Fails with [`BmsError::OutOfRange`] for values below zero, above
    /// [`Scale::max`], or not finite. Values are never clamped.
    pub fn encode(&self, field: &'static str, value: f64) -> Result<u8> {
        let max = self.max();
        if !value.is_finite() || value < 0.0 || value > max {
            return Err(BmsError::OutOfRange {
                field,
                value,
                min: 0.0,
                max,
            });
        }

        let raw = (value * self.denominator as f64 / self.numerator as f64).round();
        Ok(raw as u8)
    }
}
