//! List rules command implementation.

use cma_lint_core::RuleCode;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<30} Description", "Code", "Name");
    println!("{}", "-".repeat(100));

    for rule in RuleCode::ALL {
        println!(
            "{:<10} {:<30} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nUse --select to report only specific rules, e.g.:");
    println!("  cma-lint check --select missing-trailing-comma");
    println!("  cma-lint check --select CMA200,CMA201");
    println!("\nSuppress a finding on one line with `# noqa` or `# noqa: CMA100`.");
}
