//! Device configuration defaults
//!
//! `config_i8080` carries only an object id on the wire. The backlight and
//! bus-role pins are fixed per board and compiled in; the firmware build
//! script generates them from `board.toml`.

use i8080_hal::PinId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity of the object table
pub const MAX_OBJECTS: usize = 8;

/// Pins assigned to a device at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceDefaults {
    /// Backlight enable, driven high on configure
    pub backlight: PinId,
    /// FSMC NE1 chip select
    pub cs: PinId,
    /// FSMC A23 register select
    pub rs: PinId,
}

impl DeviceDefaults {
    /// Defaults for the reference STM32F2 board (PD12 / PD7 / PE2)
    pub const REFERENCE: DeviceDefaults = DeviceDefaults {
        backlight: PinId::from_raw(3 * 16 + 12),
        cs: PinId::from_raw(3 * 16 + 7),
        rs: PinId::from_raw(4 * 16 + 2),
    };
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self::REFERENCE
    }
}
