//! Mock implementations for testing
//!
//! [`MockStartupHal`] implements every startup capability trait and records
//! each call in order, so tests can assert on the exact bring-up sequence.
//! The two diverging calls ([`Runtime::exit`] and [`FailStop::fail_stop`])
//! unwind with a [`Halt`] payload; [`run_to_halt`] catches it.
//!
//! Unwinding only works where panics unwind (the test harness). Binaries
//! built with `panic = "abort"` install a [`HaltHook`] instead, for example
//! [`report_and_exit`], which ends the process from the diverging call.

#![cfg(any(test, feature = "std"))]

use core::cell::RefCell;
use core::fmt;
use std::boxed::Box;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::vec::Vec;

use crate::*;

/// One recorded collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalCall {
    /// [`SystemStatus::read_status`]
    ReadStatus,
    /// [`EccRam::initialize_ecc_ram`]
    EccRamInit,
    /// [`PllController::start_both_plls`], with the attempt outcome.
    PllStart {
        /// Whether this attempt locked.
        locked: bool,
    },
    /// [`CpuCore::enable_event_bus_export`]
    EventBusExport,
    /// [`ErrorSignaling::group3_status`]
    Group3Status,
    /// [`ErrorSignaling::notify_group3`] with the forwarded value.
    NotifyGroup3(u32),
    /// [`SystemControl::system_init`]
    SystemInit,
    /// [`CpuCore::enable_irq_vic_offset`]
    IrqVicOffset,
    /// [`SystemControl::initialize_vim`]
    VimInit,
    /// [`ErrorSignaling::initialize_esm`]
    EsmInit,
    /// [`MemoryProtection::initialize_mpu`]
    MpuInit,
    /// [`Runtime::init_globals`]
    GlobalInit,
    /// [`Runtime::run_application`]
    RunApplication,
    /// [`Runtime::exit`] with the exit code.
    Exit(i32),
    /// [`FailStop::fail_stop`] with the reason.
    FailStop(FailStopReason),
}

/// How a diverging startup run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// [`Runtime::exit`] was called.
    Exited(i32),
    /// [`FailStop::fail_stop`] was called.
    FailStop(FailStopReason),
}

/// Process exit status used by [`report_and_exit`] after a fail-stop.
pub const FAIL_STOP_EXIT_CODE: i32 = 3;

/// Called by the diverging mock calls instead of unwinding.
pub type HaltHook = fn(&[HalCall], Halt) -> !;

/// Recording mock for the whole startup HAL.
pub struct MockStartupHal {
    status: StatusSnapshot,
    pll_failures: u8,
    pll_attempts: u8,
    group3: u32,
    on_halt: Option<HaltHook>,
    calls: RefCell<Vec<HalCall>>,
}

impl MockStartupHal {
    /// Mock whose status register holds `status_bits`; PLLs lock on the first
    /// attempt and ESM group 3 is clear.
    pub fn new(status_bits: u32) -> Self {
        Self {
            status: StatusSnapshot::from_bits(status_bits),
            pll_failures: 0,
            pll_attempts: 0,
            group3: 0,
            on_halt: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Fail the first `failures` PLL start attempts.
    pub fn with_pll_failures(mut self, failures: u8) -> Self {
        self.pll_failures = failures;
        self
    }

    /// Report `flags` as the ESM group 3 status.
    pub fn with_group3_status(mut self, flags: u32) -> Self {
        self.group3 = flags;
        self
    }

    /// End runs through `hook` rather than unwinding with a [`Halt`].
    pub fn with_halt_hook(mut self, hook: HaltHook) -> Self {
        self.on_halt = Some(hook);
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<HalCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: HalCall) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    /// Number of PLL start attempts made.
    pub fn pll_attempts(&self) -> u8 {
        self.pll_attempts
    }

    fn record(&self, call: HalCall) {
        self.calls.borrow_mut().push(call);
    }

    fn halt(&self, halt: Halt) -> ! {
        match self.on_halt {
            Some(hook) => hook(&self.calls.borrow(), halt),
            None => panic::panic_any(halt),
        }
    }
}

impl SystemStatus for MockStartupHal {
    fn read_status(&mut self) -> StatusSnapshot {
        self.record(HalCall::ReadStatus);
        self.status
    }
}

impl EccRam for MockStartupHal {
    fn initialize_ecc_ram(&mut self) {
        self.record(HalCall::EccRamInit);
    }
}

impl PllController for MockStartupHal {
    fn start_both_plls(&mut self) -> Result<(), PllNotLocked> {
        self.pll_attempts = self.pll_attempts.saturating_add(1);
        let locked = self.pll_attempts > self.pll_failures;
        self.record(HalCall::PllStart { locked });
        if locked {
            Ok(())
        } else {
            Err(PllNotLocked)
        }
    }
}

impl CpuCore for MockStartupHal {
    fn enable_event_bus_export(&mut self) {
        self.record(HalCall::EventBusExport);
    }

    fn enable_irq_vic_offset(&mut self) {
        self.record(HalCall::IrqVicOffset);
    }
}

impl ErrorSignaling for MockStartupHal {
    fn group3_status(&self) -> u32 {
        self.record(HalCall::Group3Status);
        self.group3
    }

    fn notify_group3(&mut self, status: u32) {
        self.record(HalCall::NotifyGroup3(status));
    }

    fn initialize_esm(&mut self) {
        self.record(HalCall::EsmInit);
    }
}

impl SystemControl for MockStartupHal {
    fn system_init(&mut self) {
        self.record(HalCall::SystemInit);
    }

    fn initialize_vim(&mut self) {
        self.record(HalCall::VimInit);
    }
}

impl MemoryProtection for MockStartupHal {
    fn initialize_mpu(&mut self) {
        self.record(HalCall::MpuInit);
    }
}

impl Runtime for MockStartupHal {
    fn init_globals(&mut self) {
        self.record(HalCall::GlobalInit);
    }

    fn run_application(&mut self) {
        self.record(HalCall::RunApplication);
    }

    fn exit(&mut self, code: i32) -> ! {
        self.record(HalCall::Exit(code));
        self.halt(Halt::Exited(code))
    }
}

impl FailStop for MockStartupHal {
    fn fail_stop(&mut self, reason: FailStopReason) -> ! {
        self.record(HalCall::FailStop(reason));
        self.halt(Halt::FailStop(reason))
    }
}

impl fmt::Display for HalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalCall::ReadStatus => f.write_str("read-status"),
            HalCall::EccRamInit => f.write_str("ecc-ram-init"),
            HalCall::PllStart { locked: true } => f.write_str("pll-start (locked)"),
            HalCall::PllStart { locked: false } => f.write_str("pll-start (no lock)"),
            HalCall::EventBusExport => f.write_str("event-bus-export"),
            HalCall::Group3Status => f.write_str("esm-group3-status"),
            HalCall::NotifyGroup3(status) => write!(f, "esm-group3-notification (0x{status:08X})"),
            HalCall::SystemInit => f.write_str("system-init"),
            HalCall::IrqVicOffset => f.write_str("irq-vic-offset"),
            HalCall::VimInit => f.write_str("vim-init"),
            HalCall::EsmInit => f.write_str("esm-init"),
            HalCall::MpuInit => f.write_str("mpu-init"),
            HalCall::GlobalInit => f.write_str("global-init"),
            HalCall::RunApplication => f.write_str("application-entry"),
            HalCall::Exit(code) => write!(f, "exit({code})"),
            HalCall::FailStop(reason) => write!(f, "FAIL-STOP: {reason}"),
        }
    }
}

/// [`HaltHook`] that prints the numbered call list and the outcome to stdout,
/// then ends the process: with the exit code after [`Runtime::exit`], with
/// [`FAIL_STOP_EXIT_CODE`] after a fail-stop.
#[allow(clippy::print_stdout)]
pub fn report_and_exit(calls: &[HalCall], halt: Halt) -> ! {
    for (number, call) in (1u32..).zip(calls) {
        std::println!("  {number:2}. {call}");
    }
    match halt {
        Halt::Exited(code) => {
            std::println!("  ✓ exited with {code}");
            std::process::exit(code)
        }
        Halt::FailStop(reason) => {
            std::println!("  ✗ halted: {reason}");
            std::process::exit(FAIL_STOP_EXIT_CODE)
        }
    }
}

/// Keep the default panic hook from printing a message for every [`Halt`]
/// unwind. Other panics are reported as usual.
fn install_quiet_halt_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<Halt>().is_none() {
                previous(info);
            }
        }));
    });
}

/// Run a diverging startup closure and report how it halted.
///
/// Returns `None` if `f` returned normally, which a correct startup path
/// never does. Panics that do not carry a [`Halt`] are propagated.
pub fn run_to_halt<F: FnOnce()>(f: F) -> Option<Halt> {
    install_quiet_halt_hook();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => None,
        Err(payload) => match payload.downcast::<Halt>() {
            Ok(halt) => Some(*halt),
            Err(other) => panic::resume_unwind(other),
        },
    }
}
