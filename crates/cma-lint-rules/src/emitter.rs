//! Converts findings into host reports.

use cma_lint_core::{Finding, PluginIdentity, Report};

/// Attributes findings to a reporter.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    identity: PluginIdentity,
}

impl Emitter {
    /// Creates an emitter reporting as `identity`.
    #[must_use]
    pub fn new(identity: PluginIdentity) -> Self {
        Self { identity }
    }

    /// Returns the reporter identity.
    #[must_use]
    pub fn identity(&self) -> PluginIdentity {
        self.identity
    }

    /// Builds the report for one finding.
    #[must_use]
    pub fn report(&self, finding: &Finding) -> Report {
        Report {
            line: finding.position.line,
            column: finding.position.column,
            message: finding.coded_message(),
            reporter: self.identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_lint_core::{Position, RuleCode};

    #[test]
    fn test_report_carries_code_and_identity() {
        let identity = PluginIdentity {
            name: "cma-lint-rules",
            version: "9.9.9",
        };
        let finding = Finding::new(
            Position::new(4, 1),
            RuleCode::MissingTrailingComma,
            "trailing comma in tuple is missing",
        );

        let report = Emitter::new(identity).report(&finding);
        assert_eq!(report.line, 4);
        assert_eq!(report.column, 1);
        assert_eq!(report.message, "CMA100 trailing comma in tuple is missing");
        assert_eq!(report.reporter, identity);
    }
}
