use anyhow::{Context, Result};
use colored::Colorize;
use platform::mocks::FAIL_STOP_EXIT_CODE;
use platform::ResetCause;
use std::process::Command;

pub fn run(cause: Option<&str>, pll_failures: u8, group3: Option<&str>) -> Result<()> {
    let cause = match cause {
        Some(name) => resolve_cause(name)?.as_str(),
        None => "all",
    };

    println!();
    println!("{}", format!("▶ Simulating reset: {cause}").cyan().bold());
    println!();

    let pll_failures = pll_failures.to_string();
    let mut args = vec![
        "run",
        "-p",
        "startup",
        "--example",
        "simulate_reset",
        "--features",
        "simulator",
        "--",
        cause,
        "--pll-failures",
        pll_failures.as_str(),
    ];
    if let Some(group3) = group3 {
        args.extend(["--group3", group3]);
    }

    let status = Command::new("cargo")
        .args(&args)
        .status()
        .context("Failed to run reset simulator")?;

    // A fail-stop is a legitimate simulated outcome, not a tool failure.
    match status.code() {
        Some(0 | FAIL_STOP_EXIT_CODE) => Ok(()),
        _ => anyhow::bail!("Reset simulator exited with {status}"),
    }
}

/// Validate a cause name before handing it to the simulator.
fn resolve_cause(name: &str) -> Result<ResetCause> {
    ResetCause::ALL
        .into_iter()
        .find(|cause| cause.as_str() == name)
        .with_context(|| {
            let known: Vec<&str> = ResetCause::ALL.iter().map(|c| c.as_str()).collect();
            format!("Unknown reset cause '{name}' (expected one of: {})", known.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_every_cause_name() {
        for cause in ResetCause::ALL {
            assert_eq!(resolve_cause(cause.as_str()).unwrap(), cause);
        }
    }

    #[test]
    fn test_rejects_unknown_cause() {
        let err = resolve_cause("brown-out").unwrap_err();
        assert!(err.to_string().contains("power-on"));
    }
}
