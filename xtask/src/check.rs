use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// One `cargo` invocation in the check sequence
struct Step {
    label: &'static str,
    args: &'static [&'static str],
    /// Stop the sequence on failure instead of warning
    required: bool,
}

const STEPS: &[Step] = &[
    Step {
        label: "workspace (stdin UID source)",
        args: &["check", "--workspace", "--all-targets"],
        required: true,
    },
    Step {
        label: "kiosk with libpoll binding",
        args: &["check", "-p", "kiosk", "--features", "libpoll"],
        required: true,
    },
    Step {
        label: "clippy lints",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        required: false,
    },
    Step {
        label: "code formatting",
        args: &["fmt", "--all", "--check"],
        required: false,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking kiosk bridge...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to run cargo {}", step.args[0]))?;

        if output.status.success() {
            println!(
                "{}",
                format!("  ✓ {} passed in {:.2}s", step.label, start.elapsed().as_secs_f64()).green()
            );
        } else if step.required {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        } else {
            eprintln!("{}", format!("  ⚠ {} reported problems", step.label).yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }
        println!();
    }

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
