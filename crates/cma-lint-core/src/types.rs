//! Core types for findings, reports, and lint results.

use crate::syntax::Position;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The rules this linter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    /// CMA100: tuple literal without a trailing comma.
    MissingTrailingComma,
    /// CMA200: error message without terminal punctuation.
    MessageMissingTerminalPunctuation,
    /// CMA201: error message not wrapped in the marker call.
    MessageNotWrapped,
}

impl RuleCode {
    /// Every rule, in code order.
    pub const ALL: [Self; 3] = [
        Self::MissingTrailingComma,
        Self::MessageMissingTerminalPunctuation,
        Self::MessageNotWrapped,
    ];

    /// Returns the stable rule code (e.g., "CMA100").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingTrailingComma => "CMA100",
            Self::MessageMissingTerminalPunctuation => "CMA200",
            Self::MessageNotWrapped => "CMA201",
        }
    }

    /// Returns the kebab-case rule name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingTrailingComma => "missing-trailing-comma",
            Self::MessageMissingTerminalPunctuation => "message-missing-punctuation",
            Self::MessageNotWrapped => "message-not-wrapped",
        }
    }

    /// Returns a brief description of what the rule checks.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::MissingTrailingComma => "Requires a trailing comma after the last tuple element",
            Self::MessageMissingTerminalPunctuation => {
                "Requires validation error messages to end with terminal punctuation"
            }
            Self::MessageNotWrapped => {
                "Requires validation error messages to be wrapped in a translation marker"
            }
        }
    }

    /// Severity used when the configuration does not override it.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        Severity::Error
    }

    /// Looks a rule up by code or name.
    #[must_use]
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.code().eq_ignore_ascii_case(key) || rule.name() == key)
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One rule violation found in a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Where the violation is reported.
    pub position: Position,
    /// Which rule was violated.
    pub code: RuleCode,
    /// Human-readable text, without the code.
    pub message: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(position: Position, code: RuleCode, message: impl Into<String>) -> Self {
        Self {
            position,
            code,
            message: message.into(),
        }
    }

    /// Returns the message prefixed with its code, e.g.
    /// `"CMA100 trailing comma in tuple is missing"`.
    #[must_use]
    pub fn coded_message(&self) -> String {
        format!("{} {}", self.code.code(), self.message)
    }
}

/// Name and version a checker reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PluginIdentity {
    /// Checker name.
    pub name: &'static str,
    /// Checker version.
    pub version: &'static str,
}

impl std::fmt::Display for PluginIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A finding in the shape hosts consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column offset (0-indexed).
    pub column: usize,
    /// Coded message (`"<CODE> <text>"`).
    pub message: String,
    /// Who produced the finding.
    pub reporter: PluginIdentity,
}

impl From<Report> for (usize, usize, String, PluginIdentity) {
    fn from(report: Report) -> Self {
        (report.line, report.column, report.message, report.reporter)
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a 0-based finding position.
    #[must_use]
    pub fn from_position(file: PathBuf, position: Position) -> Self {
        Self::new(file, position.line, position.column + 1)
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a violation, as text only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Default suggestion for a rule.
    #[must_use]
    pub fn for_rule(code: RuleCode) -> Self {
        Self::new(match code {
            RuleCode::MissingTrailingComma => "Add a comma after the last element",
            RuleCode::MessageMissingTerminalPunctuation => {
                "End the message with the required punctuation"
            }
            RuleCode::MessageNotWrapped => "Wrap the message in the translation marker call",
        })
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "CMA100").
    pub code: String,
    /// Rule name (e.g., "missing-trailing-comma").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attributes a finding to `file`.
    #[must_use]
    pub fn from_finding(finding: &Finding, file: PathBuf, severity: Severity) -> Self {
        Self::new(
            finding.code.code(),
            finding.code.name(),
            severity,
            Location::from_position(file, finding.position),
            finding.message.clone(),
        )
        .with_suggestion(Suggestion::for_rule(finding.code))
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }
}
