//! # cma-lint-core
//!
//! Core model for cma-lint, independent of any parser.
//!
//! This crate provides the types the rules and frontends share:
//!
//! - [`SyntaxTree`] arena with a closed set of node kinds
//! - [`Token`] stream and the [`TokenIndex`] used for trailing-comma checks
//! - [`Checker`] trait for rule sets and [`Frontend`] trait for parsers
//! - [`Analyzer`] for running checkers over a source tree
//! - [`Violation`] and [`LintResult`] for reporting
//!
//! ## Example
//!
//! ```ignore
//! use cma_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./app")
//!     .frontend(PythonFrontend::new())
//!     .checker(CommaChecker::new(Config::default().checks))
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod checker;
mod config;
mod context;
mod frontend;
mod syntax;
mod tokens;
mod types;

/// Utility modules shared by hosts.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use checker::{CheckError, Checker, CheckerBox, SourceUnit};
pub use config::{AnalyzerConfig, CheckConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use frontend::{Frontend, FrontendBox, FrontendError, ParsedUnit};
pub use syntax::{
    Callee, Keyword, LiteralValue, MappingEntry, NodeId, NodeKind, Position, Span, SyntaxNode,
    SyntaxTree,
};
pub use tokens::{Token, TokenIndex, TokenKind};
pub use types::{
    Finding, LintResult, Location, PluginIdentity, Report, RuleCode, Severity, Suggestion,
    Violation, ViolationDiagnostic,
};
