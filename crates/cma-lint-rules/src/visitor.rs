//! Single pass over the tree collecting tuple closings and message findings.

use crate::message::MessageInspector;
use cma_lint_core::{CheckConfig, Finding, Keyword, NodeId, NodeKind, Position, SyntaxTree};
use tracing::{debug, trace};

/// Keyword naming the message argument when it is not passed positionally.
const MESSAGE_KEYWORD: &str = "message";

/// Everything one traversal collects.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    /// End positions of non-empty tuples whose last element is not starred.
    pub closings: Vec<Position>,
    /// CMA200 findings, in document order.
    pub unpunctuated: Vec<Finding>,
    /// CMA201 findings, in document order.
    pub unwrapped: Vec<Finding>,
}

/// Walks `tree` once, pre-order, in document order.
pub(crate) fn collect(tree: &SyntaxTree, settings: &CheckConfig) -> Collected {
    let mut collected = Collected::default();
    let Some(root) = tree.root() else {
        return collected;
    };
    let inspector = MessageInspector::new(tree, settings);

    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Tuple { elements } => {
                if let Some(&last) = elements.last() {
                    if tree.is_starred(last) {
                        trace!(
                            "Tuple ending at {} has a starred last element",
                            node.span.end
                        );
                    } else {
                        collected.closings.push(node.span.end);
                    }
                }
            }
            NodeKind::Call {
                func,
                arguments,
                keywords,
            } => {
                let constructor = tree
                    .callee(*func)
                    .terminal_name()
                    .filter(|name| settings.is_constructor(name));
                if let Some(constructor) = constructor {
                    match message_argument(arguments, keywords) {
                        Some(message) => inspector.inspect(message, constructor, &mut collected),
                        None => debug!(
                            "{} call at {} has no message argument",
                            constructor, node.span.start
                        ),
                    }
                }
            }
            _ => {}
        }
        stack.extend(tree.children(id).into_iter().rev());
    }

    collected
}

/// First positional argument, else the `message=` keyword.
fn message_argument(arguments: &[NodeId], keywords: &[Keyword]) -> Option<NodeId> {
    arguments.first().copied().or_else(|| {
        keywords
            .iter()
            .find(|k| k.name.as_deref() == Some(MESSAGE_KEYWORD))
            .map(|k| k.value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_lint_core::{LiteralValue, Span};

    fn span(start: usize, end: usize) -> Span {
        Span::new(Position::new(1, start), Position::new(1, end))
    }

    fn number(tree: &mut SyntaxTree, at: usize) -> NodeId {
        tree.push(
            NodeKind::Literal {
                value: LiteralValue::Number("1".to_string()),
            },
            span(at, at + 1),
        )
    }

    fn module(tree: &mut SyntaxTree, children: Vec<NodeId>) {
        let root = tree.push(
            NodeKind::Other {
                kind: "module".to_string(),
                children,
            },
            span(0, 40),
        );
        tree.set_root(root);
    }

    #[test]
    fn test_empty_tree_collects_nothing() {
        let collected = collect(&SyntaxTree::new(), &CheckConfig::default());
        assert!(collected.closings.is_empty());
        assert!(collected.unwrapped.is_empty());
    }

    #[test]
    fn test_records_tuple_closing() {
        let mut tree = SyntaxTree::new();
        let a = number(&mut tree, 1);
        let b = number(&mut tree, 4);
        let tuple = tree.push(
            NodeKind::Tuple {
                elements: vec![a, b],
            },
            span(0, 6),
        );
        module(&mut tree, vec![tuple]);

        let collected = collect(&tree, &CheckConfig::default());
        assert_eq!(collected.closings, vec![Position::new(1, 6)]);
    }

    #[test]
    fn test_skips_empty_and_starred_tuples() {
        let mut tree = SyntaxTree::new();
        let empty = tree.push(NodeKind::Tuple { elements: vec![] }, span(0, 2));
        let a = number(&mut tree, 4);
        let rest = tree.push(
            NodeKind::Identifier {
                name: "b".to_string(),
            },
            span(8, 9),
        );
        let starred = tree.push(NodeKind::Starred { value: rest }, span(7, 9));
        let target = tree.push(
            NodeKind::Tuple {
                elements: vec![a, starred],
            },
            span(4, 9),
        );
        module(&mut tree, vec![empty, target]);

        let collected = collect(&tree, &CheckConfig::default());
        assert!(collected.closings.is_empty());
    }

    #[test]
    fn test_nested_tuples_in_document_order() {
        let mut tree = SyntaxTree::new();
        let a = number(&mut tree, 2);
        let inner = tree.push(NodeKind::Tuple { elements: vec![a] }, span(1, 5));
        let b = number(&mut tree, 7);
        let outer = tree.push(
            NodeKind::Tuple {
                elements: vec![inner, b],
            },
            span(0, 9),
        );
        module(&mut tree, vec![outer]);

        let collected = collect(&tree, &CheckConfig::default());
        assert_eq!(
            collected.closings,
            vec![Position::new(1, 9), Position::new(1, 5)]
        );
    }

    #[test]
    fn test_message_keyword_fallback() {
        let mut tree = SyntaxTree::new();
        let func = tree.push(
            NodeKind::Identifier {
                name: "ValidationError".to_string(),
            },
            span(0, 15),
        );
        let message = tree.push(
            NodeKind::Literal {
                value: LiteralValue::Str("Bad".to_string()),
            },
            span(24, 29),
        );
        let call = tree.push(
            NodeKind::Call {
                func,
                arguments: vec![],
                keywords: vec![Keyword {
                    name: Some("message".to_string()),
                    value: message,
                }],
            },
            span(0, 30),
        );
        module(&mut tree, vec![call]);

        let collected = collect(&tree, &CheckConfig::default());
        assert_eq!(collected.unwrapped.len(), 1);
        assert_eq!(collected.unwrapped[0].position, Position::new(1, 24));
        assert_eq!(collected.unpunctuated[0].position, Position::new(1, 29));
    }

    #[test]
    fn test_other_keywords_are_not_messages() {
        let mut tree = SyntaxTree::new();
        let func = tree.push(
            NodeKind::Identifier {
                name: "ValidationError".to_string(),
            },
            span(0, 15),
        );
        let code = tree.push(
            NodeKind::Literal {
                value: LiteralValue::Str("invalid".to_string()),
            },
            span(21, 30),
        );
        let call = tree.push(
            NodeKind::Call {
                func,
                arguments: vec![],
                keywords: vec![Keyword {
                    name: Some("code".to_string()),
                    value: code,
                }],
            },
            span(0, 31),
        );
        module(&mut tree, vec![call]);

        let collected = collect(&tree, &CheckConfig::default());
        assert!(collected.unwrapped.is_empty());
        assert!(collected.unpunctuated.is_empty());
    }
}
