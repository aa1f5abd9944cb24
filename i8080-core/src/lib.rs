//! Board-agnostic core logic for the i8080 LCD bus firmware
//!
//! This crate contains everything between a decoded host command and a bus
//! strobe that does not depend on a specific chip:
//!
//! - Object table mapping host object ids to bus devices
//! - Command dispatch (register/data bursts, readback, fill)
//! - Shutdown handling
//! - Compiled-in device defaults
//!
//! Dispatch is synchronous and runs to completion; the caller is expected
//! to invoke it from a single execution context.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod device;
pub mod dispatch;
pub mod objects;
pub mod ssd1963;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{DeviceDefaults, MAX_OBJECTS};
pub use device::I8080Device;
pub use dispatch::{Configured, DispatchError, Dispatcher, I8080_KIND};
pub use objects::{AllocError, ObjectKind, ObjectTable};
pub use state::RunState;
