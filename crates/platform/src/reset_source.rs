//! Reset source classification.
//!
//! The system exception status register (SYSESR) latches one bit per reset
//! source. Several bits can be set at once after some fault sequences (an
//! oscillator failure also asserts the external reset line, for example), so
//! the cause is decided by a fixed priority order:
//!
//! ```text
//! POWERON ─yes─▶ PowerOn
//!    │no
//! EXT ─yes─▶ OSC_FAILURE ▶ WATCHDOG ▶ WATCHDOG2 ▶ SW ▶ (none) External
//!    │no
//! DEBUG ─yes─▶ DebugRequested
//!    │no
//! CPU0 ─yes─▶ Cpu0SelfReset
//!    │no
//! NoReset
//! ```
//!
//! The flags are read but never cleared. The vendor-generated reset handler
//! acknowledges SYSESR while classifying it; this code leaves the register
//! untouched so the application can still inspect the original value.

/// Address of the system exception status register (SYS1 SYSESR).
pub const SYSESR_ADDR: usize = 0xFFFF_FFE4;

/// SYSESR bit: power-on reset.
pub const POWERON_RESET: u32 = 0x8000;
/// SYSESR bit: oscillator failure.
pub const OSC_FAILURE_RESET: u32 = 0x4000;
/// SYSESR bit: primary watchdog violation.
pub const WATCHDOG_RESET: u32 = 0x2000;
/// SYSESR bit: secondary watchdog violation.
pub const WATCHDOG2_RESET: u32 = 0x1000;
/// SYSESR bit: debug reset request.
pub const DEBUG_RESET: u32 = 0x0800;
/// SYSESR bit: interconnect reset. Not classified on its own.
pub const INTERCONNECT_RESET: u32 = 0x0080;
/// SYSESR bit: CPU0 reset (self-test completion or CPU RESET control bit).
pub const CPU0_RESET: u32 = 0x0020;
/// SYSESR bit: software reset request.
pub const SW_RESET: u32 = 0x0010;
/// SYSESR bit: external reset (nRST pin).
pub const EXT_RESET: u32 = 0x0008;

/// One-shot copy of the exception status register.
///
/// Obtained once at entry through [`SystemStatus::read_status`] and immutable
/// afterwards. There is deliberately no way to write it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot(u32);

impl StatusSnapshot {
    /// Wrap a raw register value.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw register value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `true` if every bit in `mask` is set.
    #[inline]
    pub const fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }
}

/// Why the processor started executing from its reset vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    /// Supply came up from below the power-on threshold.
    PowerOn,
    /// Oscillator failure (reported together with an external reset).
    OscillatorFailure,
    /// Primary (digital windowed) watchdog violation.
    WatchdogPrimary,
    /// Secondary watchdog violation.
    WatchdogSecondary,
    /// Software wrote the system reset request.
    SoftwareRequested,
    /// nRST pin asserted with no more specific sub-cause.
    External,
    /// Reset requested by the debugger.
    DebugRequested,
    /// CPU0 reset after self-test completion or via the CPU reset bit.
    Cpu0SelfReset,
    /// No recognised reset flag is set.
    NoReset,
}

impl ResetCause {
    /// All causes, in classification priority order.
    pub const ALL: [ResetCause; 9] = [
        ResetCause::PowerOn,
        ResetCause::OscillatorFailure,
        ResetCause::WatchdogPrimary,
        ResetCause::WatchdogSecondary,
        ResetCause::SoftwareRequested,
        ResetCause::External,
        ResetCause::DebugRequested,
        ResetCause::Cpu0SelfReset,
        ResetCause::NoReset,
    ];

    /// Short stable name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResetCause::PowerOn => "power-on",
            ResetCause::OscillatorFailure => "oscillator-failure",
            ResetCause::WatchdogPrimary => "watchdog",
            ResetCause::WatchdogSecondary => "watchdog2",
            ResetCause::SoftwareRequested => "software",
            ResetCause::External => "external",
            ResetCause::DebugRequested => "debug",
            ResetCause::Cpu0SelfReset => "cpu0",
            ResetCause::NoReset => "none",
        }
    }

    /// The SYSESR bit that identifies this cause, `None` for [`ResetCause::NoReset`].
    pub const fn flag(self) -> Option<u32> {
        match self {
            ResetCause::PowerOn => Some(POWERON_RESET),
            ResetCause::OscillatorFailure => Some(OSC_FAILURE_RESET),
            ResetCause::WatchdogPrimary => Some(WATCHDOG_RESET),
            ResetCause::WatchdogSecondary => Some(WATCHDOG2_RESET),
            ResetCause::SoftwareRequested => Some(SW_RESET),
            ResetCause::External => Some(EXT_RESET),
            ResetCause::DebugRequested => Some(DEBUG_RESET),
            ResetCause::Cpu0SelfReset => Some(CPU0_RESET),
            ResetCause::NoReset => None,
        }
    }

    /// A SYSESR value as the hardware latches it for this cause.
    ///
    /// Oscillator failure, watchdog and software resets also assert the
    /// external reset line, so their snapshot carries `EXT_RESET` as well.
    pub const fn typical_status(self) -> StatusSnapshot {
        let bits = match self {
            ResetCause::OscillatorFailure
            | ResetCause::WatchdogPrimary
            | ResetCause::WatchdogSecondary
            | ResetCause::SoftwareRequested => match self.flag() {
                Some(flag) => flag | EXT_RESET,
                None => EXT_RESET,
            },
            _ => match self.flag() {
                Some(flag) => flag,
                None => 0,
            },
        };
        StatusSnapshot::from_bits(bits)
    }
}

impl core::fmt::Display for ResetCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the one-shot status snapshot.
pub trait SystemStatus {
    /// Read the exception status register. Called exactly once per startup.
    fn read_status(&mut self) -> StatusSnapshot;
}

/// Map a status snapshot to exactly one reset cause.
///
/// Pure: the snapshot is neither modified nor acknowledged. An all-zero or
/// otherwise unrecognised snapshot yields [`ResetCause::NoReset`].
pub const fn classify(snapshot: StatusSnapshot) -> ResetCause {
    if snapshot.contains(POWERON_RESET) {
        ResetCause::PowerOn
    } else if snapshot.contains(EXT_RESET) {
        // Sub-causes that also pull nRST take precedence over a plain external reset.
        if snapshot.contains(OSC_FAILURE_RESET) {
            ResetCause::OscillatorFailure
        } else if snapshot.contains(WATCHDOG_RESET) {
            ResetCause::WatchdogPrimary
        } else if snapshot.contains(WATCHDOG2_RESET) {
            ResetCause::WatchdogSecondary
        } else if snapshot.contains(SW_RESET) {
            ResetCause::SoftwareRequested
        } else {
            ResetCause::External
        }
    } else if snapshot.contains(DEBUG_RESET) {
        ResetCause::DebugRequested
    } else if snapshot.contains(CPU0_RESET) {
        ResetCause::Cpu0SelfReset
    } else {
        ResetCause::NoReset
    }
}
