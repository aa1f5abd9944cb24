//! i8080 Host Command Protocol
//!
//! This crate defines the UART protocol between the host (which decides what
//! to draw) and the MCU (which owns the LCD bus). The host addresses bus
//! devices by object id, exactly like a Klipper `config_*` object.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Command payloads borrow from the frame they were decoded from, so a
//! parameter buffer lives only as long as the frame being dispatched.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, PayloadReader, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{HostCommand, McuReply, ShutdownReason, READ_DATA_WORDS};
