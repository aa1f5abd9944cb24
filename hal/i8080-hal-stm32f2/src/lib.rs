//! STM32F2-specific HAL for the i8080 LCD bus firmware
//!
//! Implements the `i8080-hal` traits on top of the FSMC peripheral of the
//! STM32F2 family:
//!
//! - STM32F207VG (reference board)
//! - STM32F207ZG
//!
//! # Features
//!
//! - `stm32f207vg` / `stm32f207zg` - Chip selection, forwarded to embassy-stm32
//! - `defmt` - Enable debug formatting support
//!
//! # Bus addressing
//!
//! The display's RS line is wired to FSMC address line A23 and its CS line
//! to NE1. Writes to [`fsmc::REGISTER_ADDRESS`] therefore drive RS low and
//! writes to the following halfword drive it high.

#![no_std]

pub mod fsmc;
pub mod gpio;
pub mod uart;

pub use fsmc::{FsmcBus, FsmcEnable, FsmcTiming};
pub use gpio::{BacklightPin, GpioFactory};
