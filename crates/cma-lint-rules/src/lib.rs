//! # cma-lint-rules
//!
//! Trailing-comma and validation message rules for cma-lint.
//!
//! The rules run over a [`SyntaxTree`](cma_lint_core::SyntaxTree) and the
//! token stream of the same source, in a single traversal.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CMA100 | `missing-trailing-comma` | Tuple literal without a trailing comma |
//! | CMA200 | `message-missing-punctuation` | `ValidationError` message not ending with a dot |
//! | CMA201 | `message-not-wrapped` | `ValidationError` message not wrapped in `_` |
//!
//! ## Usage
//!
//! ```ignore
//! use cma_lint_core::CheckConfig;
//! use cma_lint_rules::Plugin;
//!
//! let settings = CheckConfig::default();
//! let plugin = Plugin::new(&tree, &tokens, &settings);
//! for report in plugin.run() {
//!     let (line, column, message, _) = report?.into();
//!     println!("{line}:{column} {message}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod emitter;
mod message;
mod plugin;
mod visitor;

pub use checker::CommaChecker;
pub use emitter::Emitter;
pub use plugin::{Plugin, IDENTITY};

/// Re-export core types for convenience.
pub use cma_lint_core::{CheckConfig, CheckError, Finding, Report, RuleCode};

/// Text reported for CMA100.
pub const TRAILING_COMMA_MESSAGE: &str = "trailing comma in tuple is missing";
