//! Startup step vocabulary and per-cause plans.
//!
//! A plan is a cause-specific prefix followed by an optional shared tail,
//! then the universal finalization steps:
//!
//! ```text
//! PowerOn          [EccRamInit, PllStart] ++ SHARED_TAIL ++ FINALIZATION_STEPS
//! DebugRequested   [EccRamInit]           ++ SHARED_TAIL ++ FINALIZATION_STEPS
//! External         [EccRamInit]           ++ SHARED_TAIL ++ FINALIZATION_STEPS
//! Cpu0SelfReset    [EventBusExport]                      ++ FINALIZATION_STEPS
//! everything else  []                                    ++ FINALIZATION_STEPS
//! ```
//!
//! ECC RAM init sits in the prefix, never in the tail, so it runs exactly once
//! for every member of the shared-tail group. For `PowerOn` it also has to
//! precede the PLL start.

use platform::ResetCause;

/// One initialization action against a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupStep {
    /// Scrub ECC-protected RAM.
    EccRamInit,
    /// Start both PLLs within the retry budget. The only fallible step.
    PllStart,
    /// Enable CPU event bus export (ECC error signaling).
    EventBusExport,
    /// Read ESM group 3 and notify if non-zero.
    EsmGroup3Check,
    /// Clock and flash configuration.
    SystemInit,
    /// Enable IRQ offset via the VIC port.
    IrqVicOffset,
    /// Initialize the VIM table.
    VimInit,
    /// Initialize the ESM.
    EsmInit,
    /// Initialize the MPU.
    MpuInit,
    /// Run global/static initializers.
    GlobalInit,
    /// Call the application entry point.
    ApplicationEntry,
}

impl StartupStep {
    /// Short stable name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            StartupStep::EccRamInit => "ecc-ram-init",
            StartupStep::PllStart => "pll-start",
            StartupStep::EventBusExport => "event-bus-export",
            StartupStep::EsmGroup3Check => "esm-group3-check",
            StartupStep::SystemInit => "system-init",
            StartupStep::IrqVicOffset => "irq-vic-offset",
            StartupStep::VimInit => "vim-init",
            StartupStep::EsmInit => "esm-init",
            StartupStep::MpuInit => "mpu-init",
            StartupStep::GlobalInit => "global-init",
            StartupStep::ApplicationEntry => "application-entry",
        }
    }
}

impl core::fmt::Display for StartupStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steps shared by `PowerOn`, `DebugRequested` and `External`.
pub const SHARED_TAIL: &[StartupStep] = &[
    StartupStep::EventBusExport,
    StartupStep::EsmGroup3Check,
    StartupStep::SystemInit,
    StartupStep::IrqVicOffset,
    StartupStep::VimInit,
    StartupStep::EsmInit,
];

/// Steps executed for every cause once dispatch has completed.
pub const FINALIZATION_STEPS: &[StartupStep] = &[
    StartupStep::MpuInit,
    StartupStep::GlobalInit,
    StartupStep::ApplicationEntry,
];

const POWER_ON_PREFIX: &[StartupStep] = &[StartupStep::EccRamInit, StartupStep::PllStart];
const RAM_INIT_PREFIX: &[StartupStep] = &[StartupStep::EccRamInit];
const CPU0_PREFIX: &[StartupStep] = &[StartupStep::EventBusExport];
const NO_STEPS: &[StartupStep] = &[];

/// Longest possible plan, finalization included.
pub const MAX_PLAN_STEPS: usize =
    POWER_ON_PREFIX.len() + SHARED_TAIL.len() + FINALIZATION_STEPS.len();

/// The ordered steps for one reset cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupPlan {
    cause: ResetCause,
    prefix: &'static [StartupStep],
    shared_tail: &'static [StartupStep],
}

impl StartupPlan {
    /// Plan for `cause`.
    pub const fn for_cause(cause: ResetCause) -> Self {
        let (prefix, shared_tail) = match cause {
            ResetCause::PowerOn => (POWER_ON_PREFIX, SHARED_TAIL),
            ResetCause::DebugRequested | ResetCause::External => (RAM_INIT_PREFIX, SHARED_TAIL),
            ResetCause::Cpu0SelfReset => (CPU0_PREFIX, NO_STEPS),
            ResetCause::OscillatorFailure
            | ResetCause::WatchdogPrimary
            | ResetCause::WatchdogSecondary
            | ResetCause::SoftwareRequested
            | ResetCause::NoReset => (NO_STEPS, NO_STEPS),
        };
        Self {
            cause,
            prefix,
            shared_tail,
        }
    }

    /// The cause this plan was built for.
    pub const fn cause(&self) -> ResetCause {
        self.cause
    }

    /// Cause-specific steps that run before the shared tail.
    pub const fn prefix(&self) -> &'static [StartupStep] {
        self.prefix
    }

    /// Whether this cause falls into the shared tail.
    pub const fn runs_shared_tail(&self) -> bool {
        !self.shared_tail.is_empty()
    }

    /// Prefix followed by the shared tail (if any). Finalization excluded.
    pub fn dispatch_steps(&self) -> impl Iterator<Item = StartupStep> + 'static {
        let prefix = self.prefix;
        let tail = self.shared_tail;
        prefix.iter().chain(tail.iter()).copied()
    }

    /// Every step in execution order, finalization included.
    pub fn steps(&self) -> impl Iterator<Item = StartupStep> + 'static {
        self.dispatch_steps().chain(FINALIZATION_STEPS.iter().copied())
    }

    /// Index of `step` in [`StartupPlan::steps`].
    pub fn position(&self, step: StartupStep) -> Option<usize> {
        self.steps().position(|s| s == step)
    }

    /// Whether `step` is part of this plan.
    pub fn contains(&self, step: StartupStep) -> bool {
        self.position(step).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn collect(plan: &StartupPlan) -> heapless::Vec<StartupStep, MAX_PLAN_STEPS> {
        plan.steps().collect()
    }

    #[test]
    fn test_power_on_plan_order() {
        let plan = StartupPlan::for_cause(ResetCause::PowerOn);
        assert_eq!(
            collect(&plan).as_slice(),
            &[
                StartupStep::EccRamInit,
                StartupStep::PllStart,
                StartupStep::EventBusExport,
                StartupStep::EsmGroup3Check,
                StartupStep::SystemInit,
                StartupStep::IrqVicOffset,
                StartupStep::VimInit,
                StartupStep::EsmInit,
                StartupStep::MpuInit,
                StartupStep::GlobalInit,
                StartupStep::ApplicationEntry,
            ]
        );
        assert_eq!(collect(&plan).len(), MAX_PLAN_STEPS);
    }

    #[test]
    fn test_debug_and_external_share_the_tail_without_pll() {
        for cause in [ResetCause::DebugRequested, ResetCause::External] {
            let plan = StartupPlan::for_cause(cause);
            assert!(plan.runs_shared_tail());
            assert_eq!(plan.prefix(), &[StartupStep::EccRamInit]);
            assert!(!plan.contains(StartupStep::PllStart), "{cause} must not start PLLs");
        }
    }

    #[test]
    fn test_ecc_ram_init_once_per_fallthrough_cause() {
        for cause in [ResetCause::PowerOn, ResetCause::DebugRequested, ResetCause::External] {
            let plan = StartupPlan::for_cause(cause);
            let inits = plan.steps().filter(|s| *s == StartupStep::EccRamInit).count();
            assert_eq!(inits, 1, "{cause}");
        }
    }

    #[test]
    fn test_classification_only_causes_run_finalization_alone() {
        for cause in [
            ResetCause::OscillatorFailure,
            ResetCause::WatchdogPrimary,
            ResetCause::WatchdogSecondary,
            ResetCause::SoftwareRequested,
            ResetCause::NoReset,
        ] {
            let plan = StartupPlan::for_cause(cause);
            assert_eq!(plan.dispatch_steps().count(), 0, "{cause}");
            assert_eq!(collect(&plan).as_slice(), FINALIZATION_STEPS);
        }
    }

    #[test]
    fn test_cpu0_enables_event_export_only() {
        let plan = StartupPlan::for_cause(ResetCause::Cpu0SelfReset);
        assert!(!plan.runs_shared_tail());
        let dispatch: heapless::Vec<StartupStep, MAX_PLAN_STEPS> = plan.dispatch_steps().collect();
        assert_eq!(dispatch.as_slice(), &[StartupStep::EventBusExport]);
    }

    #[test]
    fn test_every_plan_ends_with_application_entry() {
        for cause in ResetCause::ALL {
            let plan = StartupPlan::for_cause(cause);
            assert_eq!(plan.steps().last(), Some(StartupStep::ApplicationEntry));
            let entries = plan.steps().filter(|s| *s == StartupStep::ApplicationEntry).count();
            assert_eq!(entries, 1, "application entry at most once for {cause}");
        }
    }

    #[test]
    fn test_step_names_are_unique() {
        let plan = StartupPlan::for_cause(ResetCause::PowerOn);
        let names: heapless::Vec<&str, MAX_PLAN_STEPS> = plan.steps().map(StartupStep::as_str).collect();
        for (i, a) in names.iter().enumerate() {
            assert!(!names.iter().skip(i + 1).any(|b| a == b), "duplicate {a}");
        }
    }
}
