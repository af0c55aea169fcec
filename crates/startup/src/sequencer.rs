//! Startup sequencer: executes a [`StartupPlan`] against the HAL.
//!
//! ```text
//! read SYSESR ─▶ classify ─▶ dispatch (prefix ++ shared tail) ─┬─ Ok  ─▶ finalize ─▶ application ─▶ exit(0)
//!                                                              └─ Err ─▶ fail-stop (never returns)
//! ```
//!
//! `dispatch` returns normally so it can be tested in isolation; `finalize`
//! and `run` consume the sequencer and diverge.

use heapless::Vec;
use platform::config::{APP_NAME_SHORT, APP_VERSION, EXIT_SUCCESS, PLL_LOCK_RETRIES};
use platform::pll::{self, PllLock, PllLockError};
use platform::{classify, FailStopReason, ResetCause, StartupHal};
use thiserror_no_std::Error;

use crate::sequence::{StartupPlan, StartupStep, FINALIZATION_STEPS, MAX_PLAN_STEPS};

/// Sequencer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupConfig {
    /// PLL start attempts before giving up.
    pub pll_retries: u8,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            pll_retries: PLL_LOCK_RETRIES,
        }
    }
}

/// The only way startup can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// PLL retry budget exhausted during a power-on reset.
    #[error("startup aborted: {0}")]
    PllLock(#[from] PllLockError),
}

impl From<StartupError> for FailStopReason {
    fn from(err: StartupError) -> Self {
        match err {
            StartupError::PllLock(lock) => FailStopReason::PllLock(lock),
        }
    }
}

/// What the dispatch phase actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupTrace {
    cause: ResetCause,
    steps: Vec<StartupStep, MAX_PLAN_STEPS>,
    pll_lock: Option<PllLock>,
    group3_status: Option<u32>,
}

impl StartupTrace {
    fn new(cause: ResetCause) -> Self {
        Self {
            cause,
            steps: Vec::new(),
            pll_lock: None,
            group3_status: None,
        }
    }

    fn record(&mut self, step: StartupStep) {
        let pushed = self.steps.push(step);
        debug_assert!(pushed.is_ok(), "startup trace overflow at {}", step);
    }

    /// Cause the trace belongs to.
    pub fn cause(&self) -> ResetCause {
        self.cause
    }

    /// Executed steps, in order.
    pub fn steps(&self) -> &[StartupStep] {
        &self.steps
    }

    /// PLL lock result, if the PLLs were started.
    pub fn pll_lock(&self) -> Option<PllLock> {
        self.pll_lock
    }

    /// ESM group 3 value that was forwarded to the notification hook.
    pub fn group3_status(&self) -> Option<u32> {
        self.group3_status
    }
}

/// Runs startup steps against a HAL.
pub struct Sequencer<'a, H: StartupHal> {
    hal: &'a mut H,
    config: StartupConfig,
}

impl<'a, H: StartupHal> Sequencer<'a, H> {
    /// Sequencer over `hal`.
    pub fn new(hal: &'a mut H, config: StartupConfig) -> Self {
        Self { hal, config }
    }

    /// Execute the cause-specific part of `plan` (prefix and shared tail).
    ///
    /// Stops at the first failing step; nothing after it runs.
    pub fn dispatch(&mut self, plan: &StartupPlan) -> Result<StartupTrace, StartupError> {
        let mut trace = StartupTrace::new(plan.cause());
        for step in plan.dispatch_steps() {
            self.execute(step, &mut trace)?;
        }
        Ok(trace)
    }

    /// MPU, global initializers, application. Exits with
    /// [`EXIT_SUCCESS`] if the application ever returns.
    pub fn finalize(mut self, mut trace: StartupTrace) -> ! {
        for &step in FINALIZATION_STEPS {
            if step == StartupStep::ApplicationEntry {
                info!("starting application after {} reset", trace.cause());
            }
            if let Err(err) = self.execute(step, &mut trace) {
                self.abort(err)
            }
        }
        warn!("application returned, exiting");
        self.hal.exit(EXIT_SUCCESS)
    }

    /// Dispatch for `cause`, then finalize. On failure the fail-stop handler
    /// runs instead and the application is never reached.
    pub fn run(mut self, cause: ResetCause) -> ! {
        let plan = StartupPlan::for_cause(cause);
        match self.dispatch(&plan) {
            Ok(trace) => self.finalize(trace),
            Err(err) => self.abort(err),
        }
    }

    fn abort(&mut self, err: StartupError) -> ! {
        error!("{}", err);
        self.hal.fail_stop(err.into())
    }

    fn execute(&mut self, step: StartupStep, trace: &mut StartupTrace) -> Result<(), StartupError> {
        debug!("startup step: {}", step);
        match step {
            StartupStep::EccRamInit => self.hal.initialize_ecc_ram(),
            StartupStep::PllStart => {
                let lock = pll::start_with_retries(&mut *self.hal, self.config.pll_retries)?;
                if lock.attempts_used > 1 {
                    warn!("PLLs locked on attempt {}", lock.attempts_used);
                }
                trace.pll_lock = Some(lock);
            }
            StartupStep::EventBusExport => self.hal.enable_event_bus_export(),
            StartupStep::EsmGroup3Check => {
                let status = self.hal.group3_status();
                if status != 0 {
                    warn!("ESM group 3 error during power-up: {}", status);
                    self.hal.notify_group3(status);
                    trace.group3_status = Some(status);
                }
            }
            StartupStep::SystemInit => self.hal.system_init(),
            StartupStep::IrqVicOffset => self.hal.enable_irq_vic_offset(),
            StartupStep::VimInit => self.hal.initialize_vim(),
            StartupStep::EsmInit => self.hal.initialize_esm(),
            StartupStep::MpuInit => self.hal.initialize_mpu(),
            StartupStep::GlobalInit => self.hal.init_globals(),
            StartupStep::ApplicationEntry => self.hal.run_application(),
        }
        trace.record(step);
        Ok(())
    }
}

/// Reset entry: read the status register once, classify it and run the
/// matching startup sequence. Never returns.
pub fn startup<H: StartupHal>(hal: &mut H, config: StartupConfig) -> ! {
    let snapshot = hal.read_status();
    let cause = classify(snapshot);
    info!(
        "{} {}: reset cause {} (SYSESR {})",
        APP_NAME_SHORT,
        APP_VERSION,
        cause,
        snapshot.bits()
    );
    Sequencer::new(hal, config).run(cause)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{run_to_halt, HalCall, Halt, MockStartupHal};
    use platform::reset_source::{EXT_RESET, OSC_FAILURE_RESET, POWERON_RESET};

    fn dispatch(hal: &mut MockStartupHal, cause: ResetCause) -> Result<StartupTrace, StartupError> {
        Sequencer::new(hal, StartupConfig::default()).dispatch(&StartupPlan::for_cause(cause))
    }

    #[test]
    fn test_dispatch_trace_matches_plan() {
        for cause in ResetCause::ALL {
            let mut hal = MockStartupHal::new(0);
            let trace = dispatch(&mut hal, cause).unwrap();
            let plan = StartupPlan::for_cause(cause);
            assert!(trace.steps().iter().copied().eq(plan.dispatch_steps()), "{cause}");
            assert_eq!(trace.cause(), cause);
        }
    }

    #[test]
    fn test_dispatch_records_pll_attempts() {
        let mut hal = MockStartupHal::new(0).with_pll_failures(2);
        let trace = dispatch(&mut hal, ResetCause::PowerOn).unwrap();
        assert_eq!(trace.pll_lock(), Some(PllLock { attempts_used: 3 }));
    }

    #[test]
    fn test_dispatch_stops_at_pll_failure() {
        let mut hal = MockStartupHal::new(0).with_pll_failures(5);
        let err = dispatch(&mut hal, ResetCause::PowerOn).unwrap_err();
        assert_eq!(err, StartupError::PllLock(PllLockError { attempts: 5 }));
        assert_eq!(hal.count(HalCall::EventBusExport), 0);
    }

    #[test]
    fn test_custom_retry_budget() {
        let mut hal = MockStartupHal::new(0).with_pll_failures(2);
        let config = StartupConfig { pll_retries: 2 };
        let err = Sequencer::new(&mut hal, config)
            .dispatch(&StartupPlan::for_cause(ResetCause::PowerOn))
            .unwrap_err();
        assert_eq!(err, StartupError::PllLock(PllLockError { attempts: 2 }));
        assert_eq!(hal.pll_attempts(), 2);
    }

    #[test]
    fn test_group3_clear_is_not_notified() {
        let mut hal = MockStartupHal::new(0);
        let trace = dispatch(&mut hal, ResetCause::External).unwrap();
        assert_eq!(trace.group3_status(), None);
        assert_eq!(hal.count(HalCall::Group3Status), 1);
        assert!(!hal.calls().iter().any(|c| matches!(c, HalCall::NotifyGroup3(_))));
    }

    #[test]
    fn test_startup_power_on_exits_after_application() {
        let mut hal = MockStartupHal::new(POWERON_RESET);
        let halt = run_to_halt(|| startup(&mut hal, StartupConfig::default()));
        assert_eq!(halt, Some(Halt::Exited(EXIT_SUCCESS)));
        assert_eq!(hal.count(HalCall::RunApplication), 1);
        assert_eq!(hal.count(HalCall::ReadStatus), 1);
    }

    #[test]
    fn test_startup_oscillator_failure_skips_dispatch() {
        let mut hal = MockStartupHal::new(EXT_RESET | OSC_FAILURE_RESET);
        let halt = run_to_halt(|| startup(&mut hal, StartupConfig::default()));
        assert_eq!(halt, Some(Halt::Exited(0)));
        assert_eq!(
            hal.calls(),
            [
                HalCall::ReadStatus,
                HalCall::MpuInit,
                HalCall::GlobalInit,
                HalCall::RunApplication,
                HalCall::Exit(0),
            ]
        );
    }

    #[test]
    fn test_trace_holds_the_longest_plan() {
        let plan = StartupPlan::for_cause(ResetCause::PowerOn);
        let mut trace = StartupTrace::new(ResetCause::PowerOn);
        for step in plan.steps() {
            trace.record(step);
        }
        assert_eq!(trace.steps().len(), MAX_PLAN_STEPS);
        assert!(trace.steps().iter().copied().eq(plan.steps()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "startup trace overflow")]
    fn test_trace_overflow_is_loud() {
        let mut trace = StartupTrace::new(ResetCause::PowerOn);
        for step in StartupPlan::for_cause(ResetCause::PowerOn).steps() {
            trace.record(step);
        }
        trace.record(StartupStep::ApplicationEntry);
    }

    #[test]
    fn test_startup_error_maps_to_fail_stop_reason() {
        let err = StartupError::from(PllLockError { attempts: 5 });
        assert_eq!(
            FailStopReason::from(err),
            FailStopReason::PllLock(PllLockError { attempts: 5 })
        );
    }
}
