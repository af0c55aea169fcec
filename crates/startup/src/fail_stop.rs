//! Fail-stop handler for unrecoverable startup faults.
//!
//! Reached only when the PLLs never lock during a power-on reset. Continuing
//! would run the device on the wrong clock, so the core logs the reason and
//! parks itself. The watchdog (if the bootloader armed one) or an external
//! supervisor takes it from there.
//!
//! The handler itself compiles for every target so host tests can check that
//! it exists and logs; only [`park`] touches the CPU.

use platform::FailStopReason;

/// Marker constant, checked by tests to verify this module is linked in.
pub const FAIL_STOP_DEFINED: bool = true;

/// Log `reason` and stop forever.
///
/// # Behavior
///
/// Emits the reason at error level via defmt/RTT (hardware) so a probe can
/// read it, masks IRQs and spins. Never returns.
pub fn halt(reason: FailStopReason) -> ! {
    error!("{}", reason);
    park()
}

/// Mask interrupts and spin.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
fn park() -> ! {
    // SAFETY: `cpsid i` only sets CPSR.I; no memory is touched and this code
    // never gives interrupts back.
    unsafe {
        core::arch::asm!("cpsid i", options(nomem, nostack, preserves_flags));
    }
    loop {
        core::hint::spin_loop();
    }
}

/// Host builds have no interrupts to mask.
#[cfg(not(all(feature = "hardware", target_arch = "arm")))]
fn park() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_stop_handler_is_defined() {
        assert!(FAIL_STOP_DEFINED);
        let _handler: fn(FailStopReason) -> ! = halt;
    }
}
