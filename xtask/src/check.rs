use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

/// Cortex-R5F, hard-float ABI.
const HARDWARE_TARGET: &str = "armv7r-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking startup builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step(
        "Checking hardware target (TMS570LC43x)",
        &[
            "check",
            "-p",
            "startup",
            "--target",
            HARDWARE_TARGET,
            "--features",
            "hardware",
        ],
        OnFailure::Abort,
    )?;

    step(
        "Checking simulator (host)",
        &[
            "check",
            "-p",
            "startup",
            "--features",
            "simulator",
            "--examples",
        ],
        OnFailure::Abort,
    )?;

    step(
        "Checking platform crate (no_std)",
        &[
            "check",
            "-p",
            "platform",
            "--target",
            HARDWARE_TARGET,
            "--no-default-features",
        ],
        OnFailure::Abort,
    )?;

    // Lints and formatting are reported, not enforced, here; CI enforces them.
    step(
        "Running clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;
    step(
        "Checking code formatting",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
