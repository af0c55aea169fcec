//! Architecture boundary tests — run with `cargo test -p startup --test arch_boundaries`
// Architecture test file: unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::panic, clippy::assertions_on_constants)]
//!
//! Layering rules:
//!   Rule 1: platform (HAL traits + classifier) must not depend on startup
//!   Rule 2: the sequencer only talks to hardware through `StartupHal`
//!   Rule 3: every plan the sequencer can run honours the ordering table
//!
//! Rules 1 and 2 are enforced by the dependency graph; the tests below are
//! compile-time sanity checks for the code that links into this binary.

use platform::ResetCause;
use startup::ordering::{self, STARTUP_ORDERING_REQUIREMENTS};
use startup::StartupPlan;

/// If `platform` depended on `startup`, this binary would not link.
#[test]
fn platform_hal_is_independent() {
    fn _assert_capabilities<T: platform::StartupHal>() {}
    fn _assert_status<T: platform::SystemStatus>() {}
    fn _assert_fail_stop<T: platform::FailStop>() {}

    let cause = platform::classify(platform::StatusSnapshot::default());
    assert_eq!(cause, ResetCause::NoReset);
}

/// The sequencer is generic over the HAL; the mock is one implementation.
#[test]
fn sequencer_accepts_any_startup_hal() {
    fn _assert_sequencer<H: platform::StartupHal>(hal: &mut H) {
        let _ = startup::Sequencer::new(hal, startup::StartupConfig::default());
    }
    _assert_sequencer(&mut platform::mocks::MockStartupHal::new(0));
}

#[test]
fn fail_stop_handler_is_linked() {
    assert!(startup::fail_stop::FAIL_STOP_DEFINED);
}

#[test]
fn every_plan_satisfies_the_ordering_table() {
    assert!(!STARTUP_ORDERING_REQUIREMENTS.is_empty());
    for cause in ResetCause::ALL {
        let plan = StartupPlan::for_cause(cause);
        let violation = ordering::violations(&plan).next();
        if let Some(req) = violation {
            panic!("{cause}: {} must precede {}: {}", req.before, req.after, req.note);
        }
    }
}
