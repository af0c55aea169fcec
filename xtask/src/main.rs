// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod cargo;
mod check;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "BMS startup development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the startup image for the TMS570 target, the simulator and the no_std HAL
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run the reset simulator against the mock HAL
    Simulate {
        /// Reset cause to simulate (power-on, external, watchdog, ...); all causes if omitted
        cause: Option<String>,
        /// Number of PLL start attempts that fail before lock
        #[arg(long, default_value_t = 0)]
        pll_failures: u8,
        /// ESM group 3 status reported during power-up (decimal or 0x-prefixed hex)
        #[arg(long)]
        group3: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Simulate {
            cause,
            pll_failures,
            group3,
        } => simulate::run(cause.as_deref(), pll_failures, group3.as_deref()),
    }
}
