//! I8080 parallel bus abstractions
//!
//! An I8080 bus has two kinds of cycle: a register-select strobe (RS low)
//! that picks a controller register, and data strobes (RS high) that write
//! or read words of the selected register. Every method here is exactly one
//! bus cycle, except the provided burst helpers which are documented in
//! terms of the cycles they issue.

use crate::gpio::PinId;

/// 16-bit I8080 bus master
///
/// Writes are fire-and-forget: the bus has no acknowledge, so electrical
/// faults (no display attached, wrong timing) are invisible at this layer.
pub trait I8080Bus {
    /// Issue one register-select write cycle carrying `cmd`
    fn write_register(&mut self, cmd: u16);

    /// Issue one data write cycle carrying `word`
    fn write_data(&mut self, word: u16);

    /// Issue one data read cycle and return the sampled word
    fn read_data(&mut self) -> u16;

    /// Select `cmd`, then read `buf.len()` consecutive data words
    ///
    /// Exactly one register strobe followed by one read strobe per slot.
    fn read_register_then_data(&mut self, cmd: u16, buf: &mut [u16]) {
        self.write_register(cmd);
        for word in buf.iter_mut() {
            *word = self.read_data();
        }
    }

    /// Write a burst of data words with no register strobe in between
    fn write_data_burst(&mut self, words: &[u16]) {
        for &word in words {
            self.write_data(word);
        }
    }

    /// Write the same data word `count` times
    fn write_data_repeat(&mut self, word: u16, count: u32) {
        for _ in 0..count {
            self.write_data(word);
        }
    }
}

/// One-time electrical/timing setup of the bus for a chip-select and
/// register-select pin pair
///
/// Implementations reprogram shared peripheral registers; calling this for
/// a second pin pair changes timing for every device on the same bus.
pub trait BusEnable {
    fn enable_bus(&mut self, cs_pin: PinId, rs_pin: PinId);
}

impl<T: I8080Bus + ?Sized> I8080Bus for &mut T {
    fn write_register(&mut self, cmd: u16) {
        (**self).write_register(cmd)
    }

    fn write_data(&mut self, word: u16) {
        (**self).write_data(word)
    }

    fn read_data(&mut self) -> u16 {
        (**self).read_data()
    }
}
