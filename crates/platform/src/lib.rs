//! Hardware Abstraction Layer (HAL) for the BMS control unit startup code
//!
//! This crate provides the reset-cause decision logic and trait-based
//! abstractions for every subsystem the startup sequencer touches, enabling
//! development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (C entry point `main`)
//!         ↑ called exactly once
//! Startup sequencer (startup crate)
//!         ↓
//! Platform HAL (this crate - classifier + capability traits)
//!         ↓
//! Vendor HAL (memory init, PLL, VIM, ESM, MPU) + status registers
//! ```
//!
//! # Capabilities
//!
//! - [`SystemStatus`] - one-shot read of the exception status register
//! - [`EccRam`] - ECC-protected RAM scrub
//! - [`PllController`] - single PLL start attempt ([`pll::start_with_retries`] bounds it)
//! - [`CpuCore`] - event bus export and VIC offset mode
//! - [`ErrorSignaling`] - ESM group 3 status, notification and init
//! - [`SystemControl`] - clock/flash configuration and vector table
//! - [`MemoryProtection`] - MPU init
//! - [`Runtime`] - global initializers, application entry, process exit
//! - [`FailStop`] - diverging halt on an unrecoverable startup fault
//!
//! # Features
//!
//! - `std`: recording mocks in [`mocks`] (for host tests)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```
//! use platform::{classify, ResetCause, StatusSnapshot};
//! use platform::reset_source::{EXT_RESET, WATCHDOG_RESET};
//!
//! let snapshot = StatusSnapshot::from_bits(EXT_RESET | WATCHDOG_RESET);
//! assert_eq!(classify(snapshot), ResetCause::WatchdogPrimary);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod config;
pub mod cpu;
pub mod esm;
pub mod fault;
pub mod memory;
pub mod pll;
pub mod reset_source;
pub mod runtime;
pub mod system;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export the decision logic
pub use reset_source::{classify, ResetCause, StatusSnapshot, SystemStatus};

// Re-export capability traits
pub use cpu::CpuCore;
pub use esm::ErrorSignaling;
pub use fault::{FailStop, FailStopReason};
pub use memory::{EccRam, MemoryProtection};
pub use pll::{PllController, PllLock, PllLockError, PllNotLocked};
pub use runtime::Runtime;
pub use system::SystemControl;

/// Every capability the startup sequencer needs, as one bound.
///
/// Implemented automatically for any type that implements all of the
/// individual collaborator traits. Hardware builds use one register-backed
/// type; host tests use [`mocks::MockStartupHal`].
pub trait StartupHal:
    SystemStatus
    + EccRam
    + PllController
    + CpuCore
    + ErrorSignaling
    + SystemControl
    + MemoryProtection
    + Runtime
    + FailStop
{
}

impl<T> StartupHal for T where
    T: SystemStatus
        + EccRam
        + PllController
        + CpuCore
        + ErrorSignaling
        + SystemControl
        + MemoryProtection
        + Runtime
        + FailStop
{
}
