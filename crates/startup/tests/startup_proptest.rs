//! Property-based tests for the full reset path.
//! Any SYSESR value, PLL behaviour or ESM group 3 value must end in exactly
//! one of two ways: the application ran once and exited, or the PLLs never
//! locked on a power-on reset and the fail-stop handler ran.

// Property test file -- intentional test patterns permitted.
#![allow(clippy::panic, clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::config::{EXIT_SUCCESS, PLL_LOCK_RETRIES};
use platform::mocks::{run_to_halt, HalCall, Halt, MockStartupHal};
use platform::{classify, FailStopReason, PllLockError, ResetCause, StatusSnapshot};
use proptest::prelude::*;
use startup::{startup, StartupConfig};

proptest! {
    #[test]
    fn startup_ends_in_exit_or_fail_stop(
        bits in any::<u32>(),
        pll_failures in 0u8..=8,
        group3 in prop_oneof![Just(0u32), any::<u32>()],
    ) {
        let mut hal = MockStartupHal::new(bits)
            .with_pll_failures(pll_failures)
            .with_group3_status(group3);
        let halt = run_to_halt(|| startup(&mut hal, StartupConfig::default()));

        let cause = classify(StatusSnapshot::from_bits(bits));
        let pll_exhausted = cause == ResetCause::PowerOn && pll_failures >= PLL_LOCK_RETRIES;

        prop_assert_eq!(hal.count(HalCall::ReadStatus), 1);
        if pll_exhausted {
            let reason = FailStopReason::PllLock(PllLockError { attempts: PLL_LOCK_RETRIES });
            prop_assert_eq!(halt, Some(Halt::FailStop(reason)));
            prop_assert_eq!(hal.count(HalCall::RunApplication), 0);
            prop_assert_eq!(hal.count(HalCall::MpuInit), 0);
        } else {
            prop_assert_eq!(halt, Some(Halt::Exited(EXIT_SUCCESS)));
            prop_assert_eq!(hal.count(HalCall::RunApplication), 1);
            prop_assert_eq!(hal.count(HalCall::GlobalInit), 1);
        }
    }

    #[test]
    fn group3_is_forwarded_verbatim_when_the_tail_runs(group3 in 1u32..=u32::MAX) {
        let mut hal = MockStartupHal::new(platform::reset_source::EXT_RESET)
            .with_group3_status(group3);
        let _ = run_to_halt(|| startup(&mut hal, StartupConfig::default()));
        prop_assert_eq!(hal.count(HalCall::NotifyGroup3(group3)), 1);
    }

    #[test]
    fn pll_is_never_attempted_beyond_the_budget(pll_failures in any::<u8>()) {
        let mut hal = MockStartupHal::new(platform::reset_source::POWERON_RESET)
            .with_pll_failures(pll_failures);
        let _ = run_to_halt(|| startup(&mut hal, StartupConfig::default()));
        prop_assert!(hal.pll_attempts() <= PLL_LOCK_RETRIES);
        prop_assert_eq!(hal.pll_attempts(), pll_failures.saturating_add(1).min(PLL_LOCK_RETRIES));
    }
}
