//! BMS Control Unit startup sequencer
//!
//! Brings the TMS570LC43x (Cortex-R5F) from reset to the application entry
//! point. The reset cause is classified once from the system exception status
//! register, and the matching initialization plan runs before control is handed
//! to the C application.
//!
//! # Architecture
//!
//! ```text
//! _c_int00 (reset vector, hardware module)
//!         ↓
//! startup() - read SYSESR once, classify
//!         ↓
//! Sequencer - dispatch plan (sequence) ─▶ finalize ─▶ main() ─▶ exit(0)
//!         ↓                    └─ PLL lock failure ─▶ fail-stop
//! Platform HAL traits (platform crate)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the TMS570 target (defmt/RTT, vendor HAL symbols)
//! - `simulator` - Build for desktop runs against the recording mock (tracing)
//! - `std` - Enable standard library
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target armv7r-none-eabihf -p startup --features hardware
//! ```
//!
//! ## Simulator
//!
//! ```bash
//! cargo run -p startup --example simulate_reset --features simulator -- power-on
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

#[macro_use]
mod fmt;

pub mod fail_stop;
pub mod ordering;
pub mod sequence;
pub mod sequencer;

#[cfg(feature = "hardware")]
pub mod hardware;

pub use sequence::{StartupPlan, StartupStep};
pub use sequencer::{startup, Sequencer, StartupConfig, StartupError, StartupTrace};
