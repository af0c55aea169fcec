//! PLL start with a bounded retry budget.
//!
//! Both PLLs may fail to lock on the first try after power-on (vendor erratum
//! SSWF021#45). The start primitive is therefore retried a fixed number of
//! times; running out of attempts is the one fatal condition of the startup
//! sequence.
//!
//! The loop is a plain busy retry. Nothing else can run at this point: there
//! is no scheduler and interrupts are still masked.

use thiserror_no_std::Error;

/// A single PLL start attempt did not reach lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("PLL did not lock")]
pub struct PllNotLocked;

/// Every attempt in the retry budget failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("PLLs failed to lock after {attempts} attempts")]
pub struct PllLockError {
    /// Number of attempts made before giving up.
    pub attempts: u8,
}

/// Successful lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllLock {
    /// 1-based attempt on which both PLLs locked.
    pub attempts_used: u8,
}

/// Clock generator with two PLLs.
pub trait PllController {
    /// Start both PLLs once and report whether they locked.
    fn start_both_plls(&mut self) -> Result<(), PllNotLocked>;
}

/// Start both PLLs, retrying up to `attempts` times.
///
/// Stops at the first successful attempt. `attempts == 0` fails immediately
/// without touching the hardware.
pub fn start_with_retries<P>(pll: &mut P, attempts: u8) -> Result<PllLock, PllLockError>
where
    P: PllController + ?Sized,
{
    for attempt in 1..=attempts {
        if pll.start_both_plls().is_ok() {
            return Ok(PllLock {
                attempts_used: attempt,
            });
        }
    }
    Err(PllLockError { attempts })
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    /// Fails the first `failures` attempts, then locks.
    struct FlakyPll {
        failures: u8,
        calls: u8,
    }

    impl PllController for FlakyPll {
        fn start_both_plls(&mut self) -> Result<(), PllNotLocked> {
            self.calls += 1;
            if self.calls > self.failures {
                Ok(())
            } else {
                Err(PllNotLocked)
            }
        }
    }

    #[test]
    fn test_locks_first_try() {
        let mut pll = FlakyPll { failures: 0, calls: 0 };
        assert_eq!(start_with_retries(&mut pll, 5), Ok(PllLock { attempts_used: 1 }));
        assert_eq!(pll.calls, 1);
    }

    #[test]
    fn test_locks_on_last_allowed_attempt() {
        let mut pll = FlakyPll { failures: 4, calls: 0 };
        assert_eq!(start_with_retries(&mut pll, 5), Ok(PllLock { attempts_used: 5 }));
        assert_eq!(pll.calls, 5);
    }

    #[test]
    fn test_budget_exhausted() {
        let mut pll = FlakyPll { failures: 5, calls: 0 };
        assert_eq!(
            start_with_retries(&mut pll, 5),
            Err(PllLockError { attempts: 5 })
        );
        assert_eq!(pll.calls, 5, "no attempt beyond the budget");
    }

    #[test]
    fn test_zero_budget_never_calls_hardware() {
        let mut pll = FlakyPll { failures: 0, calls: 0 };
        assert_eq!(
            start_with_retries(&mut pll, 0),
            Err(PllLockError { attempts: 0 })
        );
        assert_eq!(pll.calls, 0);
    }

    #[test]
    fn test_error_message_names_attempts() {
        let msg = std::format!("{}", PllLockError { attempts: 5 });
        assert!(msg.contains('5'), "got: {msg}");
    }
}
