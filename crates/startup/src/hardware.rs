//! TMS570LC43x bindings (hardware target only).
//!
//! [`TmsHal`] backs every capability trait with either a volatile register
//! access or a call into the vendor-generated HAL (HALCoGen C objects linked
//! from `BMS_VENDOR_LIB_DIR`, see `build.rs`).
//!
//! # Reset vector
//!
//! `_c_int00` is the ARM-mode reset handler the vector table points at. It
//! initializes the core registers (avoids CCM-R5F compare errors on the
//! lockstep core) and the per-mode stack pointers, then branches to
//! [`stu_startup_entry`]. Neither vendor routine uses the stack, so they are
//! safe to call before the stacks exist.

use core::ffi::c_void;

use platform::esm::{ESM_BASE, ESM_SR1_GROUP3_OFFSET};
use platform::reset_source::SYSESR_ADDR;
use platform::{
    CpuCore, EccRam, ErrorSignaling, FailStop, FailStopReason, MemoryProtection, PllController,
    PllNotLocked, Runtime, StatusSnapshot, SystemControl, SystemStatus,
};

use crate::sequencer::{startup, StartupConfig};

// Vendor HAL (HL_sys_core.asm, HL_system.c, HL_sys_vim.c, HL_esm.c,
// HL_sys_mpu.asm, HL_errata_SSWF021_45.c) and the C runtime.
extern "C" {
    fn _memInit_();
    fn _errata_SSWF021_45_both_plls(count: u32) -> u32;
    fn _coreEnableEventBusExport_();
    fn esmGroup3Notification(esm: *mut c_void, flags: u32);
    fn systemInit();
    fn _coreEnableIrqVicOffset_();
    fn vimInit();
    fn esmInit();
    fn _mpuInit_();
    fn __TI_auto_init();
    #[link_name = "main"]
    fn app_main() -> i32;
    fn exit(code: i32) -> !;
}

/// One attempt per call; the retry budget lives in `platform::pll`.
const PLL_ATTEMPTS_PER_CALL: u32 = 1;

/// Register- and vendor-HAL-backed startup HAL.
pub struct TmsHal {
    _private: (),
}

impl TmsHal {
    /// Take the startup HAL.
    ///
    /// # Safety
    ///
    /// Only one instance may exist, and only on the reset path before the
    /// application runs. Every step writes hardware state that the
    /// application later owns.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl SystemStatus for TmsHal {
    fn read_status(&mut self) -> StatusSnapshot {
        // SAFETY: SYSESR is an always-mapped, word-aligned SYS1 register.
        // Reading it has no side effects; the flags are not cleared.
        let bits = unsafe { core::ptr::read_volatile(SYSESR_ADDR as *const u32) };
        StatusSnapshot::from_bits(bits)
    }
}

impl EccRam for TmsHal {
    fn initialize_ecc_ram(&mut self) {
        // SAFETY: runs before any static data is used; the RAM being scrubbed
        // holds nothing yet apart from the stacks, which the vendor routine
        // excludes.
        unsafe { _memInit_() }
    }
}

impl PllController for TmsHal {
    fn start_both_plls(&mut self) -> Result<(), PllNotLocked> {
        // SAFETY: called on the reset clock with interrupts masked, as the
        // erratum workaround requires. Returns 0 when both PLLs locked.
        let failures = unsafe { _errata_SSWF021_45_both_plls(PLL_ATTEMPTS_PER_CALL) };
        if failures == 0 {
            Ok(())
        } else {
            Err(PllNotLocked)
        }
    }
}

impl CpuCore for TmsHal {
    fn enable_event_bus_export(&mut self) {
        // SAFETY: sets a bit in the CP15 secondary auxiliary control register;
        // no memory is touched.
        unsafe { _coreEnableEventBusExport_() }
    }

    fn enable_irq_vic_offset(&mut self) {
        // SAFETY: CP15 system control write; IRQs are still masked.
        unsafe { _coreEnableIrqVicOffset_() }
    }
}

impl ErrorSignaling for TmsHal {
    fn group3_status(&self) -> u32 {
        let addr = ESM_BASE.wrapping_add(ESM_SR1_GROUP3_OFFSET);
        // SAFETY: ESM SR1[2] is an always-mapped, word-aligned register.
        // Reading does not clear it (write-1-to-clear).
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    fn notify_group3(&mut self, status: u32) {
        // SAFETY: the callback receives the ESM register block by address and
        // the value just read from it.
        unsafe { esmGroup3Notification(ESM_BASE as *mut c_void, status) }
    }

    fn initialize_esm(&mut self) {
        // SAFETY: vector table is initialized, so ESM interrupts have a target.
        unsafe { esmInit() }
    }
}

impl SystemControl for TmsHal {
    fn system_init(&mut self) {
        // SAFETY: PLLs were started (power-on) or are already running; the
        // vendor routine switches the clock tree and flash wait states.
        unsafe { systemInit() }
    }

    fn initialize_vim(&mut self) {
        // SAFETY: writes the VIM RAM vector table; VIM RAM was scrubbed by
        // `_memInit_` in the same plan.
        unsafe { vimInit() }
    }
}

impl MemoryProtection for TmsHal {
    fn initialize_mpu(&mut self) {
        // SAFETY: regions cover all memory the application touches; called
        // once, before static initialization.
        unsafe { _mpuInit_() }
    }
}

impl Runtime for TmsHal {
    fn init_globals(&mut self) {
        // SAFETY: runs exactly once, after the MPU is configured.
        unsafe { __TI_auto_init() }
    }

    fn run_application(&mut self) {
        // SAFETY: globals are initialized; the return value is unused because
        // the exit status after a return is fixed.
        let _ = unsafe { app_main() };
    }

    fn exit(&mut self, code: i32) -> ! {
        // SAFETY: C runtime exit; does not return.
        unsafe { exit(code) }
    }
}

impl FailStop for TmsHal {
    fn fail_stop(&mut self, reason: FailStopReason) -> ! {
        crate::fail_stop::halt(reason)
    }
}

/// Rust side of the reset handler. Jumped to from `_c_int00` once the stacks
/// are set up.
#[no_mangle]
pub extern "C" fn stu_startup_entry() -> ! {
    // SAFETY: the reset handler is the only caller and runs once per reset.
    let mut hal = unsafe { TmsHal::steal() };
    startup(&mut hal, StartupConfig::default())
}

#[cfg(target_arch = "arm")]
core::arch::global_asm!(
    ".section .text._c_int00,\"ax\",%progbits",
    ".global _c_int00",
    ".type _c_int00,%function",
    ".arm",
    "_c_int00:",
    "    bl _coreInitRegisters_",
    "    bl _coreInitStackPointer_",
    "    b {entry}",
    entry = sym stu_startup_entry,
);

/// `critical-section` backend for the single Cortex-R5F core: mask IRQs via
/// CPSR and restore the previous mask on release.
#[cfg(target_arch = "arm")]
mod cs {
    use critical_section::RawRestoreState;

    /// CPSR I bit.
    const CPSR_IRQ_MASK: u32 = 1 << 7;

    struct CpsrCriticalSection;
    critical_section::set_impl!(CpsrCriticalSection);

    // SAFETY: single core; masking IRQs excludes every other execution
    // context (FIQ is not used by this firmware).
    unsafe impl critical_section::Impl for CpsrCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let cpsr: u32;
            // SAFETY: reads CPSR and sets CPSR.I; acts as a compiler barrier.
            unsafe {
                core::arch::asm!("mrs {0}, cpsr", "cpsid i", out(reg) cpsr, options(nostack));
            }
            cpsr & CPSR_IRQ_MASK
        }

        unsafe fn release(was_masked: RawRestoreState) {
            if was_masked == 0 {
                // SAFETY: IRQs were enabled when the matching acquire ran.
                unsafe {
                    core::arch::asm!("cpsie i", options(nostack));
                }
            }
        }
    }
}
