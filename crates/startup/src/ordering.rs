//! Ordering requirements between startup steps.
//!
//! Several steps depend on hardware side effects of earlier ones that the
//! sequencer itself cannot observe. Getting the order wrong does not produce an
//! error code; it produces spurious ECC faults, a misclocked system or lost
//! interrupts later on.
//!
//! This table is the single source of truth for "which step must precede
//! which". Every plan in [`crate::sequence`] is checked against it in tests.
//!
//! # Sources
//!
//! - TMS570LC43x Technical Reference Manual (SPNU563): §2.4 (device
//!   initialization), §7 (L2RAMW auto-initialization), §18 (ESM)
//! - Vendor erratum SSWF021#45 (PLL lock may fail on first attempt)

use crate::sequence::{StartupPlan, StartupStep};

/// `before` must run earlier than `after` whenever a plan contains both.
pub struct OrderingRequirement {
    /// Step that must come first.
    pub before: StartupStep,
    /// Step that depends on it.
    pub after: StartupStep,
    /// Why, including the relevant manual section.
    pub note: &'static str,
}

/// All ordering requirements of the startup sequence.
pub const STARTUP_ORDERING_REQUIREMENTS: &[OrderingRequirement] = &[
    // ── RAM must be scrubbed first ────────────────────────────────────────────
    OrderingRequirement {
        before: StartupStep::EccRamInit,
        after: StartupStep::PllStart,
        note: "SPNU563 §2.4: RAM auto-init runs on the reset clock, before PLL switch-over",
    },
    OrderingRequirement {
        before: StartupStep::EccRamInit,
        after: StartupStep::EventBusExport,
        note: "uninitialized RAM would report ECC errors as soon as export is enabled",
    },
    OrderingRequirement {
        before: StartupStep::EccRamInit,
        after: StartupStep::GlobalInit,
        note: "static data lives in ECC-protected RAM",
    },
    // ── Clocks ────────────────────────────────────────────────────────────────
    OrderingRequirement {
        before: StartupStep::PllStart,
        after: StartupStep::SystemInit,
        note: "SSWF021#45: systemInit switches GCLK to the PLLs, which must be locked",
    },
    // ── ESM ───────────────────────────────────────────────────────────────────
    OrderingRequirement {
        before: StartupStep::EsmGroup3Check,
        after: StartupStep::EsmInit,
        note: "SPNU563 §18: group 3 power-up flags are inspected before ESM is reconfigured",
    },
    // ── Interrupts ────────────────────────────────────────────────────────────
    OrderingRequirement {
        before: StartupStep::IrqVicOffset,
        after: StartupStep::VimInit,
        note: "VIC port mode is selected before the VIM table is populated",
    },
    OrderingRequirement {
        before: StartupStep::VimInit,
        after: StartupStep::EsmInit,
        note: "ESM may raise interrupts as soon as it is configured; vectors must exist",
    },
    // ── Finalization ──────────────────────────────────────────────────────────
    OrderingRequirement {
        before: StartupStep::MpuInit,
        after: StartupStep::GlobalInit,
        note: "MPU regions are in place before static data is written",
    },
    OrderingRequirement {
        before: StartupStep::GlobalInit,
        after: StartupStep::ApplicationEntry,
        note: "the application relies on initialized globals and constructors",
    },
    OrderingRequirement {
        before: StartupStep::MpuInit,
        after: StartupStep::ApplicationEntry,
        note: "the application never runs without memory protection",
    },
];

/// Requirements that `plan` violates.
pub fn violations(plan: &StartupPlan) -> impl Iterator<Item = &'static OrderingRequirement> + '_ {
    STARTUP_ORDERING_REQUIREMENTS.iter().filter(move |req| {
        match (plan.position(req.before), plan.position(req.after)) {
            (Some(before), Some(after)) => before >= after,
            _ => false,
        }
    })
}

/// `true` if `plan` satisfies every applicable requirement.
pub fn is_satisfied(plan: &StartupPlan) -> bool {
    violations(plan).next().is_none()
}
