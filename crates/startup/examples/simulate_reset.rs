//! Reset simulator
//!
//! Runs the startup sequencer against the recording mock HAL and prints the
//! collaborator calls it made.
//! Run with: cargo run -p startup --example simulate_reset --features simulator -- [CAUSE|all] [--pll-failures N] [--group3 VALUE]
//!
//! CAUSE is one of: power-on, oscillator-failure, watchdog, watchdog2,
//! software, external, debug, cpu0, none. Default: all.
//!
//! Every run ends inside the mock's `exit`/`fail_stop`, which print the call
//! list and end the process. `all` therefore runs one child process per cause.

use std::process::Command;

use platform::config;
use platform::mocks::{report_and_exit, MockStartupHal, FAIL_STOP_EXIT_CODE};
use platform::ResetCause;
use startup::{startup, StartupConfig};
use tracing_subscriber::EnvFilter;

/// Set for child runs so the banner is printed once.
const QUIET_ENV: &str = "SIMULATE_RESET_CHILD";

struct Options {
    causes: Vec<ResetCause>,
    pll_failures: u8,
    group3: u32,
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        causes: ResetCause::ALL.to_vec(),
        pll_failures: 0,
        group3: 0,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pll-failures" => {
                options.pll_failures = args.next().ok_or("--pll-failures needs a value")?.parse()?;
            }
            "--group3" => {
                let value = args.next().ok_or("--group3 needs a value")?;
                options.group3 = match value.strip_prefix("0x") {
                    Some(hex) => u32::from_str_radix(hex, 16)?,
                    None => value.parse()?,
                };
            }
            "all" => options.causes = ResetCause::ALL.to_vec(),
            name => {
                let cause = ResetCause::ALL
                    .into_iter()
                    .find(|c| c.as_str() == name)
                    .ok_or_else(|| format!("unknown reset cause '{name}'"))?;
                options.causes = vec![cause];
            }
        }
    }
    Ok(options)
}

/// Simulate one reset in this process. Never returns: the mock ends the
/// process from `exit` or `fail_stop`, so no unwinding is involved.
fn simulate(cause: ResetCause, options: &Options) -> ! {
    let status = cause.typical_status();
    let mut hal = MockStartupHal::new(status.bits())
        .with_pll_failures(options.pll_failures)
        .with_group3_status(options.group3)
        .with_halt_hook(report_and_exit);

    println!("── {cause} (SYSESR 0x{:04X}) ──", status.bits());
    startup(&mut hal, StartupConfig::default())
}

/// Run each cause in its own child process, since every run ends the process.
fn simulate_each(causes: &[ResetCause], options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let exe = std::env::current_exe()?;
    for cause in causes {
        let status = Command::new(&exe)
            .arg(cause.as_str())
            .args(["--pll-failures", &options.pll_failures.to_string()])
            .args(["--group3", &options.group3.to_string()])
            .env(QUIET_ENV, "1")
            .status()?;
        match status.code() {
            Some(0 | FAIL_STOP_EXIT_CODE) => println!(),
            _ => return Err(format!("simulation of {cause} failed: {status}").into()),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = parse_args()?;
    if std::env::var_os(QUIET_ENV).is_none() {
        println!("{} (reset simulator, v{})", config::banner(), config::APP_VERSION);
        println!("PLL failures: {}, ESM group 3: 0x{:08X}\n", options.pll_failures, options.group3);
    }

    match options.causes.as_slice() {
        [cause] => simulate(*cause, &options),
        causes => simulate_each(causes, &options),
    }
}
