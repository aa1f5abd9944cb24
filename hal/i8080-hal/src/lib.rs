//! i8080 Hardware Abstraction Layer
//!
//! This crate defines the hardware seams used by the command dispatcher.
//! The same dispatch code drives the real FSMC peripheral on the MCU and a
//! recording bus in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Dispatcher (i8080-core)                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  i8080-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  i8080-hal-   │
//!             │   stm32f2     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::I8080Bus`] - Register-select and data strobes
//! - [`bus::BusEnable`] - One-time electrical setup of the bus
//! - [`gpio::OutputPin`], [`gpio::OutputFactory`] - Digital outputs

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use bus::{BusEnable, I8080Bus};
pub use gpio::{Level, OutputFactory, OutputPin, PinId};
