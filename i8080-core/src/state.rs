//! Run state
//!
//! The dispatcher is either active or shut down. Shutdown is one-way: only
//! a reset of the MCU returns to `Active`.

use i8080_protocol::ShutdownReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    #[default]
    Active,
    Shutdown(ShutdownReason),
}

impl RunState {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, RunState::Shutdown(_))
    }

    /// Apply an abort event
    ///
    /// The first reason sticks; later aborts do not overwrite it.
    pub fn abort(self, reason: ShutdownReason) -> Self {
        match self {
            RunState::Active => RunState::Shutdown(reason),
            shutdown => shutdown,
        }
    }
}
