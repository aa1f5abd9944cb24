//! FSMC-backed I8080 bus
//!
//! The FSMC NOR/SRAM bank 1 is set up in 16-bit mode A with separate read
//! and write timings. The display register select is decoded from address
//! line A23, so a register cycle and a data cycle differ only in the
//! halfword address they hit.

use embassy_stm32::gpio::{AfType, AnyPin, Flex, OutputType, Pull, Speed};
use embassy_stm32::pac::fsmc::vals::{Accmod, Cpsize, Mtyp, Mwid, Waitcfg, Waitpol};
use embassy_stm32::rcc;
use heapless::Vec;
use i8080_hal::{BusEnable, I8080Bus, PinId};

/// FSMC control register block
const CONTROL_ADDRESS: usize = 0xA000_0000;

/// Bank 1 base (NE1)
const BANK1_ADDRESS: usize = 0x6000_0000;

/// Register-select halfword: every address line up to A23 high, RS low
pub const REGISTER_ADDRESS: usize = BANK1_ADDRESS | 0x00FF_FFFE;

/// Data halfword: the next 16-bit slot, which carries A23 high (RS high)
pub const DATA_ADDRESS: usize = REGISTER_ADDRESS + 2;

/// Alternate function number of every FSMC signal on the F2
pub const FSMC_AF: u8 = 12;

const FIXED_PIN_COUNT: usize = 18;

/// Fixed FSMC signals: D0-D15, NOE (RD) and NWE (WR)
pub const FSMC_FIXED_PINS: [PinId; FIXED_PIN_COUNT] = [
    pin('D', 14),
    pin('D', 15),
    pin('D', 0),
    pin('D', 1),
    pin('E', 7),
    pin('E', 8),
    pin('E', 9),
    pin('E', 10),
    pin('E', 11),
    pin('E', 12),
    pin('E', 13),
    pin('E', 14),
    pin('E', 15),
    pin('D', 8),
    pin('D', 9),
    pin('D', 10),
    // NOE: LCD RD
    pin('D', 4),
    // NWE: LCD WR
    pin('D', 5),
];

const fn pin(port: char, index: u8) -> PinId {
    match PinId::new(port, index) {
        Some(id) => id,
        None => panic!("invalid FSMC pin"),
    }
}

/// Bus cycle timing, in HCLK cycles
#[derive(Debug, Clone, Copy)]
pub struct FsmcTiming {
    pub access_mode: Accmod,
    /// Bus turnaround (0-15)
    pub bus_turnaround: u8,
    /// Data phase (1-255)
    pub data: u8,
    /// Address hold (0-15, unused in mode A)
    pub address_hold: u8,
    /// Address setup (0-15)
    pub address_setup: u8,
}

impl FsmcTiming {
    /// Read (and default) timing: ADDSET 2 HCLK, DATAST 15 HCLK
    pub const READ_WRITE: Self = Self::mode_a(0x0F, 0x00, 0x01);

    /// Write timing: ADDSET 1 HCLK, DATAST 16 HCLK
    pub const WRITE: Self = Self::mode_a(0x10, 0x00, 0x00);

    pub const fn mode_a(data: u8, address_hold: u8, address_setup: u8) -> Self {
        Self {
            access_mode: Accmod::A,
            bus_turnaround: 0,
            data,
            address_hold,
            address_setup,
        }
    }
}

/// I8080 bus master issuing cycles through bank 1
///
/// Zero-sized; every method is a single volatile halfword access. The bus
/// must have been enabled by [`FsmcEnable`] before the first cycle, or the
/// access faults.
#[derive(Debug, Default)]
pub struct FsmcBus {
    _private: (),
}

impl FsmcBus {
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl I8080Bus for FsmcBus {
    #[inline]
    fn write_register(&mut self, cmd: u16) {
        // SAFETY: REGISTER_ADDRESS lies in FSMC bank 1, mapped once enabled
        unsafe { core::ptr::write_volatile(REGISTER_ADDRESS as *mut u16, cmd) }
    }

    #[inline]
    fn write_data(&mut self, word: u16) {
        // SAFETY: as above
        unsafe { core::ptr::write_volatile(DATA_ADDRESS as *mut u16, word) }
    }

    #[inline]
    fn read_data(&mut self) -> u16 {
        // SAFETY: as above
        unsafe { core::ptr::read_volatile(DATA_ADDRESS as *const u16) }
    }
}

/// Electrical setup of FSMC bank 1
///
/// Owns the pins it switches to the FSMC alternate function so they stay
/// configured. Enabling again with a different cs/rs pair releases the old
/// pair first.
pub struct FsmcEnable {
    read_timing: FsmcTiming,
    write_timing: FsmcTiming,
    fixed: Vec<Flex<'static>, FIXED_PIN_COUNT>,
    cs: Option<Flex<'static>>,
    rs: Option<Flex<'static>>,
    clock_enabled: bool,
}

impl FsmcEnable {
    pub fn new(read_timing: FsmcTiming, write_timing: FsmcTiming) -> Self {
        Self {
            read_timing,
            write_timing,
            fixed: Vec::new(),
            cs: None,
            rs: None,
            clock_enabled: false,
        }
    }

    fn af_pin(id: PinId) -> Flex<'static> {
        let af_type = AfType::output_pull(OutputType::PushPull, Speed::VeryHigh, Pull::None);
        // SAFETY: pin ids come from the board configuration, which reserves
        // them for the FSMC; nothing else in the firmware claims them.
        let mut flex = Flex::new(unsafe { AnyPin::steal(id.raw()) });
        flex.set_as_af_unchecked(FSMC_AF, af_type);
        flex
    }

    fn program_bank(&self) {
        // SAFETY: the FSMC register block is only written from here
        let fsmc = unsafe { embassy_stm32::pac::fsmc::Fsmc::from_ptr(CONTROL_ADDRESS as _) };

        fsmc.bcr(0).write(|w| {
            w.set_cburstrw(false);
            w.set_cpsize(Cpsize::NO_BURST_SPLIT);
            w.set_asyncwait(false);
            // Separate read and write timing
            w.set_extmod(true);
            w.set_waiten(false);
            w.set_wren(true);
            w.set_waitcfg(Waitcfg::BEFORE_WAIT_STATE);
            w.set_waitpol(Waitpol::ACTIVE_LOW);
            w.set_bursten(false);
            w.set_faccen(true);
            w.set_mwid(Mwid::BITS16);
            w.set_mtyp(Mtyp::FLASH);
            w.set_muxen(false);
            w.set_mbken(true);
        });

        let read = self.read_timing;
        fsmc.btr(0).write(|w| {
            w.set_accmod(read.access_mode);
            w.set_busturn(read.bus_turnaround);
            w.set_datast(read.data);
            w.set_addhld(read.address_hold);
            w.set_addset(read.address_setup);
        });

        let write = self.write_timing;
        fsmc.bwtr(0).write(|w| {
            w.set_accmod(write.access_mode);
            w.set_busturn(write.bus_turnaround);
            w.set_datast(write.data);
            w.set_addhld(write.address_hold);
            w.set_addset(write.address_setup);
        });
    }
}

impl BusEnable for FsmcEnable {
    fn enable_bus(&mut self, cs_pin: PinId, rs_pin: PinId) {
        if self.fixed.is_empty() {
            for id in FSMC_FIXED_PINS {
                // Capacity equals the pin count
                let _ = self.fixed.push(Self::af_pin(id));
            }
        }

        // Release the previous pair before re-claiming, in case it is the same
        self.cs = None;
        self.rs = None;
        self.cs = Some(Self::af_pin(cs_pin));
        self.rs = Some(Self::af_pin(rs_pin));

        if !self.clock_enabled {
            rcc::enable_and_reset::<embassy_stm32::peripherals::FSMC>();
            self.clock_enabled = true;
        }

        self.program_bank();

        #[cfg(feature = "defmt")]
        defmt::debug!("FSMC bank 1 enabled: cs={} rs={}", cs_pin, rs_pin);
    }
}
