//! Startup configuration and constants
//!
//! Central values shared by the classifier, the sequencer and the hardware
//! bindings. Reference these constants rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "BMS Control Unit";

/// Short name used as a log prefix
pub const APP_NAME_SHORT: &str = "BMS";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of attempts the PLLs get to lock after a power-on reset.
///
/// Exhausting the budget is fatal: the fail-stop handler runs and the
/// application never starts.
pub const PLL_LOCK_RETRIES: u8 = 5;

/// Process exit status passed to [`crate::Runtime::exit`] when the
/// application entry point returns.
pub const EXIT_SUCCESS: i32 = 0;

/// Startup banner
pub const fn banner() -> &'static str {
    "BMS Control Unit - startup"
}
