//! [`Checker`] implementation for hosts that drive the analyzer.

use crate::plugin::{Plugin, IDENTITY};
use cma_lint_core::{
    CheckConfig, CheckError, Checker, Finding, PluginIdentity, RuleCode, SourceUnit,
};

/// Runs CMA100, CMA200 and CMA201 as one checker.
#[derive(Debug, Clone, Default)]
pub struct CommaChecker {
    settings: CheckConfig,
}

impl CommaChecker {
    /// Creates a checker with the given settings.
    #[must_use]
    pub fn new(settings: CheckConfig) -> Self {
        Self { settings }
    }

    /// Returns the active settings.
    #[must_use]
    pub fn settings(&self) -> &CheckConfig {
        &self.settings
    }
}

impl Checker for CommaChecker {
    fn identity(&self) -> PluginIdentity {
        IDENTITY
    }

    fn codes(&self) -> &'static [RuleCode] {
        &RuleCode::ALL
    }

    fn check(&self, unit: &SourceUnit<'_>) -> Result<Vec<Finding>, CheckError> {
        Plugin::new(unit.tree, unit.tokens, &self.settings)
            .findings()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_lint_core::SyntaxTree;

    #[test]
    fn test_reports_every_rule() {
        let checker = CommaChecker::default();
        assert_eq!(checker.codes().len(), 3);
        assert_eq!(checker.identity(), IDENTITY);
    }

    #[test]
    fn test_empty_unit_has_no_findings() {
        let tree = SyntaxTree::new();
        let unit = SourceUnit::new(&tree, &[]);
        let findings = CommaChecker::default().check(&unit).expect("empty unit");
        assert!(findings.is_empty());
    }
}
