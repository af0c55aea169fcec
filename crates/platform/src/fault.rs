//! Fail-stop contract for unrecoverable startup faults.

use thiserror_no_std::Error;

use crate::pll::PllLockError;

/// Why startup was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailStopReason {
    /// The PLLs never locked; the system would run un- or mis-clocked.
    #[error("fail-stop: {0}")]
    PllLock(PllLockError),
}

/// Diverging halt.
///
/// Implementations must never return: halt, trap, or spin until the
/// watchdog resets the device. The `-> !` return type enforces it.
pub trait FailStop {
    /// Put the system in a safe state and stop.
    fn fail_stop(&mut self, reason: FailStopReason) -> !;
}
