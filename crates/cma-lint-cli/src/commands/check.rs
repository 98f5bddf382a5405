//! Check command implementation.

use anyhow::{Context, Result};
use cma_lint_core::{Analyzer, Config, LintResult, RuleCode};
use cma_lint_py::PythonFrontend;
use cma_lint_rules::CommaChecker;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    paths: &[PathBuf],
    format: OutputFormat,
    select: Option<&str>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let mut config = match source.path() {
        Some(p) => {
            tracing::info!("Using config: {}", p.display());
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
        None => Config::default(),
    };

    if let Some(select) = select {
        config.restrict_to(&parse_select(select));
    }

    let mut result = LintResult::new();
    for path in paths {
        let analyzer = Analyzer::builder()
            .root(path)
            .frontend(PythonFrontend::new())
            .checker(CommaChecker::new(config.checks.clone()))
            .excludes(exclude.iter().cloned())
            .config(config.clone())
            .build()
            .context("Failed to build analyzer")?;

        tracing::info!(
            "Analyzing {:?} with {} checker(s)",
            path,
            analyzer.checker_count()
        );

        let mut found = analyzer
            .analyze()
            .with_context(|| format!("Analysis of {} failed", path.display()))?;
        display_relative_to(&mut found, path);
        result.extend(found);
    }
    result.sort();

    super::output::print(&result, format)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Parses a `--select` list; unknown entries are warned about and dropped.
fn parse_select(select: &str) -> Vec<RuleCode> {
    select
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|key| {
            let rule = RuleCode::lookup(key);
            if rule.is_none() {
                tracing::warn!("Unknown rule: {}", key);
            }
            rule
        })
        .collect()
}

/// Rewrites violation paths so they are relative to where the user ran the
/// command rather than to `checked`.
fn display_relative_to(result: &mut LintResult, checked: &Path) {
    let base = if checked.is_file() {
        checked.parent().unwrap_or(Path::new(""))
    } else {
        checked
    };
    for violation in &mut result.violations {
        violation.location.file = base.join(&violation.location.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_lint_core::{Finding, Position, Severity, Violation};

    #[test]
    fn select_accepts_codes_and_names() {
        assert_eq!(
            parse_select("CMA100, message-not-wrapped"),
            vec![RuleCode::MissingTrailingComma, RuleCode::MessageNotWrapped]
        );
    }

    #[test]
    fn select_drops_unknown_entries() {
        assert_eq!(
            parse_select("E501,,cma200"),
            vec![RuleCode::MessageMissingTerminalPunctuation]
        );
    }

    #[test]
    fn paths_are_shown_under_the_checked_directory() {
        let finding = Finding::new(Position::new(1, 0), RuleCode::MissingTrailingComma, "x");
        let mut result = LintResult::new();
        result.violations.push(Violation::from_finding(
            &finding,
            PathBuf::from("forms.py"),
            Severity::Error,
        ));

        display_relative_to(&mut result, Path::new("app"));
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("app/forms.py")
        );
    }
}
