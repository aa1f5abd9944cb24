//! I8080 bus device instance

use i8080_hal::{Level, OutputFactory, OutputPin, PinId};

use crate::config::DeviceDefaults;

/// One display attached to the I8080 bus
///
/// Created by `config_i8080`. The shutdown handler clears the pin ids but
/// leaves the slot and the backlight alone.
#[derive(Debug)]
pub struct I8080Device<P> {
    backlight: P,
    cs_pin: PinId,
    rs_pin: PinId,
}

impl<P: OutputPin> I8080Device<P> {
    /// Set up the backlight (driven high) and record the bus-role pins
    pub fn setup<G>(gpio: &mut G, defaults: &DeviceDefaults) -> Self
    where
        G: OutputFactory<Output = P>,
    {
        Self {
            backlight: gpio.setup_output(defaults.backlight, Level::High),
            cs_pin: defaults.cs,
            rs_pin: defaults.rs,
        }
    }

    pub fn cs_pin(&self) -> PinId {
        self.cs_pin
    }

    pub fn rs_pin(&self) -> PinId {
        self.rs_pin
    }

    pub fn backlight(&self) -> &P {
        &self.backlight
    }

    /// True once the shutdown handler has cleared both pin ids
    pub fn is_quiesced(&self) -> bool {
        self.cs_pin.is_unbound() && self.rs_pin.is_unbound()
    }

    /// Reset the bus-role pins to the unbound sentinel
    pub fn quiesce(&mut self) {
        self.cs_pin = PinId::UNBOUND;
        self.rs_pin = PinId::UNBOUND;
    }
}
