//! # cma-lint-py
//!
//! Tree-sitter based Python frontend for cma-lint.
//!
//! [`PythonFrontend`] parses Python source and produces the two inputs the
//! rules consume: a [`SyntaxTree`](cma_lint_core::SyntaxTree) and the token
//! stream of the same source.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod literal;
mod lower;
mod tokens;

use cma_lint_core::{Frontend, FrontendError, ParsedUnit};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

const LANGUAGE_ID: &str = "python";

/// Parses Python source with tree-sitter.
pub struct PythonFrontend {
    language: Language,
}

impl PythonFrontend {
    /// Creates a new Python frontend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }
}

impl Default for PythonFrontend {
    fn default() -> Self {
        Self::new()
    }
}

/// First error or missing node, in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

impl Frontend for PythonFrontend {
    fn language_id(&self) -> &'static str {
        LANGUAGE_ID
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn parse(&self, source: &str) -> Result<ParsedUnit, FrontendError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| FrontendError::Language {
            language: LANGUAGE_ID,
            message: e.to_string(),
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| FrontendError::Language {
            language: LANGUAGE_ID,
            message: "parser produced no tree".to_string(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            debug!("Syntax error at {}:{}", at.row + 1, at.column);
            return Err(FrontendError::Syntax {
                line: at.row + 1,
                column: at.column,
            });
        }

        let syntax = lower::lower(root, source.as_bytes());
        let tokens = tokens::collect(root, source);
        debug!("Lowered {} nodes and {} tokens", syntax.len(), tokens.len());

        Ok(ParsedUnit {
            tree: syntax,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_module() {
        let unit = PythonFrontend::new()
            .parse("x = (1, 2)\n")
            .expect("valid source");
        assert!(unit.tree.root().is_some());
        assert!(unit.tokens.len() > 2);
    }

    #[test]
    fn test_empty_source() {
        let unit = PythonFrontend::new().parse("").expect("valid source");
        assert_eq!(unit.tokens.len(), 2);
    }

    #[test]
    fn test_syntax_error_location() {
        let err = PythonFrontend::new()
            .parse("x = 1\ny = (\n")
            .expect_err("unbalanced parenthesis");
        assert!(matches!(err, FrontendError::Syntax { .. }));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(PythonFrontend::new().extensions(), &["py", "pyi"]);
    }
}
