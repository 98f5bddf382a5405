//! Frontend trait: turns source text into a tree and a token stream.
//!
//! `Frontend` is the extension point for adding languages. The analyzer
//! only talks to this trait, never to a concrete parser.

use crate::syntax::SyntaxTree;
use crate::tokens::Token;

/// Errors a frontend can report.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader error message.
        message: String,
    },

    /// The source could not be parsed.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (0-indexed).
        column: usize,
    },
}

/// Output of a frontend for one source unit.
#[derive(Debug, Clone, Default)]
pub struct ParsedUnit {
    /// The syntax tree.
    pub tree: SyntaxTree,
    /// The token stream, in source order.
    pub tokens: Vec<Token>,
}

/// Language-specific parser producing the inputs checkers consume.
pub trait Frontend: Send + Sync {
    /// Language identifier (e.g., `"python"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this frontend handles, without the dot (e.g., `&["py"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses one source unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar fails to load or the source has
    /// syntax errors.
    fn parse(&self, source: &str) -> Result<ParsedUnit, FrontendError>;
}

/// Type alias for boxed Frontend trait objects.
pub type FrontendBox = Box<dyn Frontend>;
