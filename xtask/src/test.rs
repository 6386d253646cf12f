use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Which half of the suite a step belongs to
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Unit,
    Integration,
}

impl Kind {
    fn selected(self, unit_only: bool, integration_only: bool) -> bool {
        match self {
            Self::Unit => !integration_only,
            Self::Integration => !unit_only,
        }
    }
}

struct Step {
    label: &'static str,
    kind: Kind,
    args: &'static [&'static str],
}

const STEPS: &[Step] = &[
    Step {
        label: "unit tests",
        kind: Kind::Unit,
        args: &["test", "--workspace", "--lib", "--bins"],
    },
    Step {
        label: "doc tests",
        kind: Kind::Unit,
        args: &["test", "--workspace", "--doc"],
    },
    // Real FIFOs and fake framebuffers under a temporary directory.
    Step {
        label: "integration tests",
        kind: Kind::Integration,
        args: &["test", "--workspace", "--test", "*"],
    },
];

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        if !step.kind.selected(unit_only, integration_only) {
            continue;
        }

        println!("{}", format!("  Running {}...", step.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to run {}", step.label))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            for line in stdout.lines() {
                eprintln!("  {}", line);
            }
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        }

        println!(
            "{}",
            format!(
                "  ✓ {} passed {} in {:.2}s",
                step.label,
                extract_test_summary(&stdout),
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn extract_test_summary(output: &str) -> String {
    // Sum every "test result: ok. 5 passed; 0 failed; ..." line; a
    // workspace run prints one per test binary.
    let mut passed = 0u64;
    let mut binaries = 0u64;
    for line in output.lines() {
        let Some(summary) = line.split("test result:").nth(1) else {
            continue;
        };
        binaries += 1;
        passed += summary
            .split(';')
            .find_map(|part| part.trim().trim_start_matches("ok.").trim().strip_suffix(" passed"))
            .and_then(|n| n.trim().parse::<u64>().ok())
            .unwrap_or(0);
    }
    if binaries == 0 {
        return "(summary not available)".to_string();
    }
    format!("({passed} passed across {binaries} test binaries)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_results_across_binaries() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out

running 2 tests
test result: ok. 2 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out
";
        assert_eq!(extract_test_summary(output), "(5 passed across 2 test binaries)");
    }

    #[test]
    fn flags_select_steps() {
        let labels = |unit, integration| -> Vec<_> {
            STEPS
                .iter()
                .filter(|step| step.kind.selected(unit, integration))
                .map(|step| step.label)
                .collect()
        };
        assert_eq!(labels(false, false).len(), STEPS.len());
        assert_eq!(labels(true, false), ["unit tests", "doc tests"]);
        assert_eq!(labels(false, true), ["integration tests"]);
    }

    #[test]
    fn missing_summary() {
        assert_eq!(extract_test_summary("error: could not compile"), "(summary not available)");
    }
}
