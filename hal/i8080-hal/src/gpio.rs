//! GPIO pin abstractions
//!
//! Provides the output-pin trait used for the backlight, the factory the
//! dispatcher uses to create outputs at configuration time, and the compact
//! pin identifier shared by every crate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Compact pin identifier: `port * 16 + index`
///
/// Port A is 0, so `PD7` is `3 * 16 + 7 = 55`. The value 0 doubles as the
/// "unbound" sentinel written by the shutdown handler, which means a
/// quiesced pin reads the same as `PA0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinId(u8);

/// Highest supported port letter (STM32F2 exposes GPIOA..GPIOI)
pub const LAST_PORT: char = 'I';

impl PinId {
    /// Sentinel for a pin that is no longer bound to a bus role
    pub const UNBOUND: PinId = PinId(0);

    /// Build a pin id from a port letter and pin index
    pub const fn new(port: char, index: u8) -> Option<Self> {
        if port < 'A' || port > LAST_PORT || index > 15 {
            return None;
        }
        Some(PinId((port as u8 - b'A') * 16 + index))
    }

    /// Reconstruct a pin id from its raw encoding
    pub const fn from_raw(raw: u8) -> Self {
        PinId(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Port number (A = 0)
    pub const fn port(self) -> u8 {
        self.0 / 16
    }

    /// Pin index within the port (0-15)
    pub const fn index(self) -> u8 {
        self.0 % 16
    }

    pub const fn port_letter(self) -> char {
        (b'A' + self.port()) as char
    }

    pub const fn is_unbound(self) -> bool {
        self.0 == Self::UNBOUND.0
    }

    /// Parse a pin string from config
    ///
    /// Supports `"PD7"`, and `"!PD7"` for an active-low pin (the flag is
    /// returned alongside the id).
    pub fn parse(s: &str) -> Option<(Self, bool)> {
        let s = s.trim();

        let (s, inverted) = match s.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let mut chars = s.strip_prefix('P')?.chars();
        let port = chars.next()?;
        let index: u8 = chars.as_str().parse().ok()?;

        Some((Self::new(port, index)?, inverted))
    }
}

/// Initial or requested output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Creates output pins at runtime from a [`PinId`]
///
/// Configuration commands run long after boot, so the pin to drive is only
/// known as an id, not as a typed peripheral.
pub trait OutputFactory {
    type Output: OutputPin;

    /// Configure `pin` as a push-pull output driven to `initial`
    fn setup_output(&mut self, pin: PinId, initial: Level) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_encoding() {
        let pd7 = PinId::new('D', 7).unwrap();
        assert_eq!(pd7.raw(), 55);
        assert_eq!(pd7.port(), 3);
        assert_eq!(pd7.index(), 7);
        assert_eq!(pd7.port_letter(), 'D');

        let pe2 = PinId::new('E', 2).unwrap();
        assert_eq!(pe2.raw(), 66);
    }

    #[test]
    fn test_pin_out_of_range() {
        assert!(PinId::new('J', 0).is_none());
        assert!(PinId::new('A', 16).is_none());
        assert!(PinId::new('a', 1).is_none());
    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(PinId::parse("PD12"), Some((PinId::new('D', 12).unwrap(), false)));
        assert_eq!(PinId::parse(" !PE2 "), Some((PinId::new('E', 2).unwrap(), true)));
        assert_eq!(PinId::parse("PD"), None);
        assert_eq!(PinId::parse("XD1"), None);
        assert_eq!(PinId::parse("PD16"), None);
        assert_eq!(PinId::parse("PZ1"), None);
    }

    #[test]
    fn test_unbound_sentinel() {
        assert!(PinId::UNBOUND.is_unbound());
        assert_eq!(PinId::UNBOUND, PinId::new('A', 0).unwrap());
        assert!(!PinId::new('D', 7).unwrap().is_unbound());
    }
}
