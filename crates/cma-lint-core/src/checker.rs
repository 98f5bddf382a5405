//! Checker trait for plugging rule sets into the analyzer.

use crate::syntax::SyntaxTree;
use crate::tokens::Token;
use crate::types::{Finding, PluginIdentity, RuleCode};

/// Errors a checker can raise on inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// A position taken from the tree has no token ending there. The tree
    /// and the token stream do not describe the same source.
    #[error("no token ends at {line}:{column}; syntax tree and tokens disagree")]
    UnmatchedPosition {
        /// Line of the unmatched position (1-indexed).
        line: usize,
        /// Column of the unmatched position (0-indexed).
        column: usize,
    },
}

/// One parsed source unit, as handed to a checker.
#[derive(Debug, Clone, Copy)]
pub struct SourceUnit<'a> {
    /// The syntax tree.
    pub tree: &'a SyntaxTree,
    /// The token stream of the same source.
    pub tokens: &'a [Token],
}

impl<'a> SourceUnit<'a> {
    /// Creates a new source unit.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree, tokens: &'a [Token]) -> Self {
        Self { tree, tokens }
    }
}

/// A set of rules run together over a single traversal.
///
/// # Example
///
/// ```ignore
/// use cma_lint_core::{Checker, CheckError, Finding, PluginIdentity, RuleCode, SourceUnit};
///
/// pub struct NoTuples;
///
/// impl Checker for NoTuples {
///     fn identity(&self) -> PluginIdentity {
///         PluginIdentity { name: "no-tuples", version: "0.1.0" }
///     }
///     fn codes(&self) -> &'static [RuleCode] {
///         &[RuleCode::MissingTrailingComma]
///     }
///     fn check(&self, unit: &SourceUnit<'_>) -> Result<Vec<Finding>, CheckError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Checker: Send + Sync {
    /// Returns the name and version findings are attributed to.
    fn identity(&self) -> PluginIdentity;

    /// Returns the rules this checker can report.
    fn codes(&self) -> &'static [RuleCode];

    /// Checks one source unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit's tree and tokens are inconsistent.
    fn check(&self, unit: &SourceUnit<'_>) -> Result<Vec<Finding>, CheckError>;
}

/// Type alias for boxed Checker trait objects.
pub type CheckerBox = Box<dyn Checker>;
