//! Embassy async tasks
//!
//! The RX task owns the dispatcher and runs every command to completion;
//! the TX task only drains replies.

pub mod host_rx;
pub mod host_tx;

pub use host_rx::{host_rx_task, FirmwareDispatcher};
pub use host_tx::host_tx_task;
