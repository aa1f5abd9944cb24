//! GPIO outputs for STM32F2
//!
//! Pins are created at runtime from a [`PinId`], so the factory steals the
//! pin singleton by its `port * 16 + index` number. That encoding matches
//! embassy's own, so no translation is needed.

use core::convert::Infallible;

use embassy_stm32::gpio::{self, AnyPin, Output, Speed};
use embedded_hal::digital::StatefulOutputPin;
use i8080_hal::{Level, OutputFactory, OutputPin, PinId};

/// Push-pull output driving the display backlight
///
/// Generic over any infallible embedded-hal output. The level is mirrored
/// locally because embedded-hal state queries need `&mut self`.
pub struct BacklightPin<P = Output<'static>> {
    inner: P,
    high: bool,
}

impl<P: StatefulOutputPin<Error = Infallible>> BacklightPin<P> {
    pub fn new(mut inner: P) -> Self {
        let high = inner.is_set_high().unwrap_or_else(|e| match e {});
        Self { inner, high }
    }
}

impl<P> OutputPin for BacklightPin<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        self.inner.set_high().unwrap_or_else(|e| match e {});
        self.high = true;
    }

    fn set_low(&mut self) {
        self.inner.set_low().unwrap_or_else(|e| match e {});
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Creates embassy outputs for configured pins
#[derive(Debug, Default)]
pub struct GpioFactory {
    _private: (),
}

impl GpioFactory {
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl OutputFactory for GpioFactory {
    type Output = BacklightPin;

    fn setup_output(&mut self, pin: PinId, initial: Level) -> BacklightPin {
        let level = match initial {
            Level::Low => gpio::Level::Low,
            Level::High => gpio::Level::High,
        };
        // SAFETY: output pins come from the board configuration and are not
        // claimed elsewhere.
        let pin = unsafe { AnyPin::steal(pin.raw()) };
        BacklightPin::new(Output::new(pin, level, Speed::Low))
    }
}
