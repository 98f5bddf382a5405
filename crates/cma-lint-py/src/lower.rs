//! Lowering of the tree-sitter concrete tree into a [`SyntaxTree`].
//!
//! Children are lowered before their parent with an explicit frame stack.
//! Each finished node leaves its id on a result stack, where the parent
//! picks it up again.

use crate::literal::{self, StringLiteral};
use cma_lint_core::{
    Keyword, LiteralValue, MappingEntry, NodeId, NodeKind, Position, Span, SyntaxTree,
};
use tree_sitter::{Node, Point};

enum Frame<'t> {
    Enter(Node<'t>),
    Exit(Node<'t>, usize),
}

/// A call argument; keyword names are `None` for `**mapping`.
enum Argument<'t> {
    Positional(Node<'t>),
    Keyword(Option<Node<'t>>, Node<'t>),
}

impl<'t> Argument<'t> {
    fn value(&self) -> Node<'t> {
        match self {
            Self::Positional(value) | Self::Keyword(_, value) => *value,
        }
    }
}

/// A dictionary entry; `**mapping` has no key.
enum Entry<'t> {
    Pair(Node<'t>, Node<'t>),
    Splat(Node<'t>),
}

pub(crate) fn point(p: Point) -> Position {
    Position::new(p.row + 1, p.column)
}

pub(crate) fn span_of(node: Node<'_>) -> Span {
    Span::new(point(node.start_position()), point(node.end_position()))
}

/// Lowers the tree rooted at `root`, which must be free of errors.
pub(crate) fn lower(root: Node<'_>, src: &[u8]) -> SyntaxTree {
    let mut lowering = Lowering {
        src,
        tree: SyntaxTree::new(),
    };
    let mut results: Vec<NodeId> = Vec::new();
    let mut frames = vec![Frame::Enter(root)];

    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Enter(node) => {
                let operands = operands(node);
                frames.push(Frame::Exit(node, operands.len()));
                frames.extend(operands.into_iter().rev().map(Frame::Enter));
            }
            Frame::Exit(node, count) => {
                let lowered = results.split_off(results.len().saturating_sub(count));
                results.push(lowering.build(node, lowered));
            }
        }
    }

    let mut tree = lowering.tree;
    if let Some(root) = results.pop() {
        tree.set_root(root);
    }
    tree
}

fn is_leaf(kind: &str) -> bool {
    matches!(
        kind,
        "string"
            | "concatenated_string"
            | "integer"
            | "float"
            | "true"
            | "false"
            | "none"
            | "ellipsis"
            | "identifier"
    )
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn call_arguments(call: Node<'_>) -> Vec<Argument<'_>> {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    if arguments.kind() == "generator_expression" {
        return vec![Argument::Positional(arguments)];
    }
    named_children(arguments)
        .into_iter()
        .filter_map(|arg| match arg.kind() {
            "keyword_argument" => arg
                .child_by_field_name("value")
                .map(|value| Argument::Keyword(arg.child_by_field_name("name"), value)),
            "dictionary_splat" => named_children(arg)
                .first()
                .map(|value| Argument::Keyword(None, *value)),
            _ => Some(Argument::Positional(arg)),
        })
        .collect()
}

fn dictionary_entries(dict: Node<'_>) -> Vec<Entry<'_>> {
    named_children(dict)
        .into_iter()
        .filter_map(|entry| match entry.kind() {
            "pair" => entry
                .child_by_field_name("key")
                .zip(entry.child_by_field_name("value"))
                .map(|(key, value)| Entry::Pair(key, value)),
            "dictionary_splat" => named_children(entry).first().copied().map(Entry::Splat),
            _ => None,
        })
        .collect()
}

/// Nodes lowered before `node`, in the order `build` consumes them.
fn operands(node: Node<'_>) -> Vec<Node<'_>> {
    match node.kind() {
        "call" => match node.child_by_field_name("function") {
            Some(func) => std::iter::once(func)
                .chain(call_arguments(node).iter().map(Argument::value))
                .collect(),
            None => named_children(node),
        },
        "dictionary" => dictionary_entries(node)
            .iter()
            .flat_map(|entry| match entry {
                Entry::Pair(key, value) => vec![*key, *value],
                Entry::Splat(value) => vec![*value],
            })
            .collect(),
        "attribute" => node.child_by_field_name("object").into_iter().collect(),
        kind if is_leaf(kind) => Vec::new(),
        _ => named_children(node),
    }
}

/// Match statement patterns are not tuples even when they look like one.
fn in_case_clause(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "case_clause" {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn is_delete_target_list(node: Node<'_>) -> bool {
    matches!(node.parent(), Some(parent) if parent.kind() == "delete_statement")
}

/// Span of the implicit tuple in `x[a, b]`: from the first index to the last
/// index or trailing comma, brackets excluded.
fn index_span(subscript: Node<'_>) -> Option<Span> {
    let mut cursor = subscript.walk();
    let mut inside = subscript
        .children(&mut cursor)
        .skip_while(|child| child.kind() != "[")
        .skip(1)
        .take_while(|child| child.kind() != "]")
        .filter(|child| !child.is_extra());
    let first = inside.next()?;
    let last = inside.last().unwrap_or(first);
    Some(Span::new(point(first.start_position()), point(last.end_position())))
}

fn has_comma(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == ",");
    found
}

struct Lowering<'s> {
    src: &'s [u8],
    tree: SyntaxTree,
}

impl Lowering<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.src).unwrap_or_default()
    }

    fn other(node: Node<'_>, children: Vec<NodeId>) -> NodeKind {
        NodeKind::Other {
            kind: node.kind().to_string(),
            children,
        }
    }

    fn build(&mut self, node: Node<'_>, lowered: Vec<NodeId>) -> NodeId {
        let span = span_of(node);
        let kind = match node.kind() {
            // `del a, b` lists its targets without building a tuple.
            "expression_list" if is_delete_target_list(node) => Self::other(node, lowered),
            "tuple" | "expression_list" | "pattern_list" => NodeKind::Tuple { elements: lowered },
            "tuple_pattern" if !in_case_clause(node) => NodeKind::Tuple { elements: lowered },
            "parenthesized_expression" | "parenthesized_list_splat" if lowered.len() == 1 => {
                return lowered[0];
            }
            "list_splat" | "list_splat_pattern" if lowered.len() == 1 => {
                NodeKind::Starred { value: lowered[0] }
            }
            // `1, 2` as a statement has no node of its own.
            "expression_statement" if has_comma(node) => {
                let tuple = self.tree.push(NodeKind::Tuple { elements: lowered }, span);
                Self::other(node, vec![tuple])
            }
            "subscript" if has_comma(node) => self.subscript(node, lowered),
            "call" => self.call(node, lowered),
            "dictionary" => Self::mapping(node, lowered),
            "list" | "set" => NodeKind::Sequence { elements: lowered },
            "attribute" => self.attribute(node, lowered),
            "identifier" => NodeKind::Identifier {
                name: self.text(node).to_string(),
            },
            "string" => self.string(node, literal::parse_string(self.text(node))),
            "concatenated_string" => {
                let mut cursor = node.walk();
                let parts: Vec<StringLiteral> = node
                    .named_children(&mut cursor)
                    .filter(|part| part.kind() == "string")
                    .map(|part| literal::parse_string(self.text(part)))
                    .collect();
                self.string(node, literal::concatenate(parts))
            }
            "integer" | "float" => NodeKind::Literal {
                value: LiteralValue::Number(self.text(node).to_string()),
            },
            "true" => NodeKind::Literal {
                value: LiteralValue::Bool(true),
            },
            "false" => NodeKind::Literal {
                value: LiteralValue::Bool(false),
            },
            "none" => NodeKind::Literal {
                value: LiteralValue::None,
            },
            "ellipsis" => NodeKind::Literal {
                value: LiteralValue::Ellipsis,
            },
            _ => Self::other(node, lowered),
        };
        self.tree.push(kind, span)
    }

    fn attribute(&self, node: Node<'_>, lowered: Vec<NodeId>) -> NodeKind {
        let attr = node.child_by_field_name("attribute");
        match (lowered.first().copied(), attr) {
            (Some(value), Some(attr)) => NodeKind::Attribute {
                value,
                attr: self.text(attr).to_string(),
            },
            _ => Self::other(node, lowered),
        }
    }

    fn string(&self, node: Node<'_>, literal: StringLiteral) -> NodeKind {
        match literal {
            StringLiteral::Str(text) => NodeKind::Literal {
                value: LiteralValue::Str(text),
            },
            StringLiteral::Bytes(bytes) => NodeKind::Literal {
                value: LiteralValue::Bytes(bytes),
            },
            // Interpolations stay opaque: the whole string is a single token.
            StringLiteral::Formatted => Self::other(node, Vec::new()),
        }
    }

    fn call(&self, node: Node<'_>, lowered: Vec<NodeId>) -> NodeKind {
        if node.child_by_field_name("function").is_none() {
            return Self::other(node, lowered);
        }
        let mut ids = lowered.into_iter();
        let Some(func) = ids.next() else {
            return Self::other(node, Vec::new());
        };

        let mut arguments = Vec::new();
        let mut keywords = Vec::new();
        for (argument, value) in call_arguments(node).into_iter().zip(ids) {
            match argument {
                Argument::Positional(_) => arguments.push(value),
                Argument::Keyword(name, _) => keywords.push(Keyword {
                    name: name.map(|n| self.text(n).to_string()),
                    value,
                }),
            }
        }

        NodeKind::Call {
            func,
            arguments,
            keywords,
        }
    }

    /// `x[a, b]` indexes with a tuple of everything after the value.
    fn subscript(&mut self, node: Node<'_>, mut lowered: Vec<NodeId>) -> NodeKind {
        let Some(span) = index_span(node) else {
            return Self::other(node, lowered);
        };
        if lowered.len() < 2 {
            return Self::other(node, lowered);
        }
        let elements = lowered.split_off(1);
        let tuple = self.tree.push(NodeKind::Tuple { elements }, span);
        lowered.push(tuple);
        Self::other(node, lowered)
    }

    fn mapping(node: Node<'_>, lowered: Vec<NodeId>) -> NodeKind {
        let mut ids = lowered.into_iter();
        let mut entries = Vec::new();
        for entry in dictionary_entries(node) {
            let (key, value) = match entry {
                Entry::Pair(..) => (ids.next(), ids.next()),
                Entry::Splat(_) => (None, ids.next()),
            };
            if let Some(value) = value {
                entries.push(MappingEntry { key, value });
            }
        }
        NodeKind::Mapping { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> SyntaxTree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("failed to set python language");
        let tree = parser.parse(source, None).expect("failed to parse");
        lower(tree.root_node(), source.as_bytes())
    }

    /// Every node reachable from the root, pre-order.
    fn walk(tree: &SyntaxTree) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(tree.children(id).into_iter().rev());
        }
        out
    }

    fn find<'t>(tree: &'t SyntaxTree, pred: impl Fn(&NodeKind) -> bool) -> Vec<&'t NodeKind> {
        walk(tree)
            .into_iter()
            .map(|id| &tree.node(id).kind)
            .filter(|kind| pred(kind))
            .collect()
    }

    fn tuples(tree: &SyntaxTree) -> Vec<Span> {
        walk(tree)
            .into_iter()
            .filter(|id| matches!(tree.node(*id).kind, NodeKind::Tuple { .. }))
            .map(|id| tree.node(id).span)
            .collect()
    }

    #[test]
    fn test_parenthesized_tuple_span_includes_parens() {
        let tree = parse("(1, 2, 3)");
        assert_eq!(
            tuples(&tree),
            vec![Span::new(Position::new(1, 0), Position::new(1, 9))]
        );
    }

    #[test]
    fn test_bare_tuples() {
        assert_eq!(tuples(&parse("x = 1, 2")).len(), 1);
        assert_eq!(tuples(&parse("1, 2")).len(), 1);
        assert_eq!(tuples(&parse("def f():\n    return 1, 2\n")).len(), 1);
        assert_eq!(tuples(&parse("for a, b in pairs:\n    pass\n")).len(), 1);
    }

    #[test]
    fn test_parentheses_alone_are_not_tuples() {
        let tree = parse("x = (1)");
        assert!(tuples(&tree).is_empty());
        assert_eq!(
            find(&tree, |k| matches!(k, NodeKind::Literal { .. })).len(),
            1
        );
    }

    #[test]
    fn test_subscript_indices_form_a_tuple() {
        assert!(tuples(&parse("x[1]")).is_empty());
        assert_eq!(
            tuples(&parse("x[a, f(n)]")),
            vec![Span::new(Position::new(1, 2), Position::new(1, 9))]
        );
        assert_eq!(
            tuples(&parse("x[1, 2,]")),
            vec![Span::new(Position::new(1, 2), Position::new(1, 7))]
        );
    }

    #[test]
    fn test_delete_targets_are_not_a_tuple() {
        assert!(tuples(&parse("del a, b")).is_empty());
        assert_eq!(tuples(&parse("del (a, b)")).len(), 1);
    }

    #[test]
    fn test_case_patterns_are_not_tuples() {
        let source = "match p:\n    case (1, 2):\n        pass\n";
        assert!(tuples(&parse(source)).is_empty());
    }

    #[test]
    fn test_starred_target() {
        let tree = parse("a, *b = c");
        let found = find(&tree, |k| matches!(k, NodeKind::Tuple { .. }));
        let NodeKind::Tuple { elements } = found[0] else {
            panic!("expected a tuple");
        };
        assert!(tree.is_starred(elements[1]));
    }

    #[test]
    fn test_call_arguments() {
        let tree = parse("f(a, *rest, message=m, **extra)");
        let found = find(&tree, |k| matches!(k, NodeKind::Call { .. }));
        let NodeKind::Call {
            arguments,
            keywords,
            ..
        } = found[0]
        else {
            panic!("expected a call");
        };
        assert_eq!(arguments.len(), 2);
        assert!(tree.is_starred(arguments[1]));
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].name.as_deref(), Some("message"));
        assert_eq!(keywords[1].name, None);
    }

    #[test]
    fn test_attribute_callee() {
        let tree = parse("rest_framework.exceptions.ValidationError(x)");
        let found = find(&tree, |k| matches!(k, NodeKind::Call { .. }));
        let NodeKind::Call { func, .. } = found[0] else {
            panic!("expected a call");
        };
        assert_eq!(tree.callee(*func).terminal_name(), Some("ValidationError"));
    }

    #[test]
    fn test_dictionary_entries() {
        let tree = parse("{'a': 1, **rest}");
        let found = find(&tree, |k| matches!(k, NodeKind::Mapping { .. }));
        let NodeKind::Mapping { entries } = found[0] else {
            panic!("expected a mapping");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[0].key.is_some());
        assert!(entries[1].key.is_none());
    }

    #[test]
    fn test_string_values() {
        let tree = parse("x = ('Hello ' 'world.', b'raw', f'{y}')");
        let strings: Vec<&LiteralValue> = walk(&tree)
            .into_iter()
            .filter_map(|id| match &tree.node(id).kind {
                NodeKind::Literal { value } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(
            strings,
            vec![
                &LiteralValue::Str("Hello world.".to_string()),
                &LiteralValue::Bytes("raw".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_not_children() {
        let tree = parse("x = (\n    1,  # one\n    2,\n)\n");
        let found = find(&tree, |k| matches!(k, NodeKind::Tuple { .. }));
        let NodeKind::Tuple { elements } = found[0] else {
            panic!("expected a tuple");
        };
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 1_000;
        let source = format!("x = {}1{}", "[".repeat(depth), "]".repeat(depth));
        let tree = parse(&source);
        assert_eq!(
            find(&tree, |k| matches!(k, NodeKind::Sequence { .. })).len(),
            depth
        );
    }
}
