//! Target-specific pin capabilities
//!
//! Which pins are safe to pre-register, which numbers map to real GPIOs, and
//! which pins carry a DAC differ between chip variants. Everything else in
//! the crate is target-agnostic and consults [`Target`] for these three
//! questions.

use serde::{Deserialize, Serialize};

/// Pins safe to expose as placeholders on the classic ESP32
const ESP32_SAFE_PINS: &[u16] = &[2, 12, 13, 14, 15, 36, 39, 34, 35, 32, 33];

/// Pins safe to expose as placeholders on the ESP32-S3
const ESP32_S3_SAFE_PINS: &[u16] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 14, 15, 16, 17, 18, 21, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42,
];

/// Supported chip variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Target {
    /// Classic ESP32
    #[default]
    Esp32,
    /// ESP32-S3 (no DAC, different GPIO range)
    Esp32S3,
}

impl Target {
    /// Pins that are safe to pre-register as placeholders on this target
    pub fn safe_pins(&self) -> &'static [u16] {
        match self {
            Target::Esp32 => ESP32_SAFE_PINS,
            Target::Esp32S3 => ESP32_S3_SAFE_PINS,
        }
    }

    /// Whether `pin` maps to a physical GPIO on this target
    pub fn is_real_gpio(&self, pin: u16) -> bool {
        match self {
            Target::Esp32 => pin <= 39,
            Target::Esp32S3 => pin <= 21 || (26..=48).contains(&pin),
        }
    }

    /// Whether `pin` carries a DAC on this target
    pub fn is_dac_pin(&self, pin: u16) -> bool {
        match self {
            Target::Esp32 => pin == 25 || pin == 26,
            Target::Esp32S3 => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_pins_are_real_gpios() {
        for target in [Target::Esp32, Target::Esp32S3] {
            for &pin in target.safe_pins() {
                assert!(target.is_real_gpio(pin), "{:?} pin {} not a GPIO", target, pin);
            }
        }
    }

    #[test]
    fn test_dac_pins() {
        assert!(Target::Esp32.is_dac_pin(25));
        assert!(Target::Esp32.is_dac_pin(26));
        assert!(!Target::Esp32.is_dac_pin(27));
        assert!(!Target::Esp32S3.is_dac_pin(25));
    }

    #[test]
    fn test_gpio_ranges() {
        assert!(Target::Esp32.is_real_gpio(0));
        assert!(Target::Esp32.is_real_gpio(39));
        assert!(!Target::Esp32.is_real_gpio(40));

        assert!(Target::Esp32S3.is_real_gpio(21));
        assert!(!Target::Esp32S3.is_real_gpio(22));
        assert!(Target::Esp32S3.is_real_gpio(26));
        assert!(Target::Esp32S3.is_real_gpio(48));
        assert!(!Target::Esp32S3.is_real_gpio(49));
    }
}
