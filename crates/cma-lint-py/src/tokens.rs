//! Token stream built from the leaves of the concrete tree.

use crate::lower::point;
use cma_lint_core::{Position, Token, TokenKind};
use tree_sitter::Node;

fn kind_of(node: Node<'_>) -> TokenKind {
    match node.kind() {
        "," => TokenKind::Comma,
        "comment" => TokenKind::Comment,
        "line_continuation" => TokenKind::Nl,
        _ => TokenKind::Other,
    }
}

/// Position just past the last byte of `source`.
fn end_of(source: &str) -> Position {
    let line = source.matches('\n').count() + 1;
    let column = source.len() - source.rfind('\n').map_or(0, |i| i + 1);
    Position::new(line, column)
}

/// Collects the leaves under `root` in document order, framed by
/// `StreamStart` and `EndMarker`. A string is a single token.
pub(crate) fn collect(root: Node<'_>, source: &str) -> Vec<Token> {
    let src = source.as_bytes();
    let origin = Position::new(0, 0);
    let mut tokens = vec![Token::new(TokenKind::StreamStart, "", origin, origin)];

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "string" || node.child_count() == 0 {
            if node.start_byte() < node.end_byte() {
                tokens.push(Token::new(
                    kind_of(node),
                    node.utf8_text(src).unwrap_or_default(),
                    point(node.start_position()),
                    point(node.end_position()),
                ));
            }
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    let end = end_of(source);
    tokens.push(Token::new(TokenKind::EndMarker, "", end, end));
    tokens
}
