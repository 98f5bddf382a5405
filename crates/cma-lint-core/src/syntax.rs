//! Arena-backed syntax tree handed to checkers by a frontend.
//!
//! Nodes are pushed children-first, so a parent can only reference ids that
//! already exist. The root is set last. Document order is the order of the
//! child lists, not the order of the arena.

use serde::{Deserialize, Serialize};

/// Source position: 1-based line, 0-based column (UTF-8 byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column offset (0-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}

/// Start and end of a node in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First position covered by the node.
    pub start: Position,
    /// Position just past the node.
    pub end: Position,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Opaque handle into a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

/// Value of a literal scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    /// A decoded string literal.
    Str(String),
    /// A bytes literal, kept as written between the quotes.
    Bytes(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// `True` or `False`.
    Bool(bool),
    /// `None`.
    None,
    /// `...`.
    Ellipsis,
}

impl LiteralValue {
    /// Returns the string value, if this is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A keyword argument of a call. `name` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    /// Keyword name.
    pub name: Option<String>,
    /// Argument value.
    pub value: NodeId,
}

/// An entry of a mapping display. `key` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Entry key.
    pub key: Option<NodeId>,
    /// Entry value.
    pub value: NodeId,
}

/// The closed set of node kinds checkers dispatch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Tuple display or target list, with or without parentheses.
    Tuple {
        /// Elements in source order.
        elements: Vec<NodeId>,
    },
    /// Call expression.
    Call {
        /// The called expression.
        func: NodeId,
        /// Positional arguments, including starred ones.
        arguments: Vec<NodeId>,
        /// Keyword arguments, including `**` splats.
        keywords: Vec<Keyword>,
    },
    /// Literal scalar.
    Literal {
        /// The literal's value.
        value: LiteralValue,
    },
    /// Mapping display (`{k: v}`).
    Mapping {
        /// Entries in source order.
        entries: Vec<MappingEntry>,
    },
    /// List or set display.
    Sequence {
        /// Elements in source order.
        elements: Vec<NodeId>,
    },
    /// Bare name.
    Identifier {
        /// The name.
        name: String,
    },
    /// Attribute access (`value.attr`).
    Attribute {
        /// The object being accessed.
        value: NodeId,
        /// The attribute name.
        attr: String,
    },
    /// Starred element (`*value`).
    Starred {
        /// The expression being unpacked.
        value: NodeId,
    },
    /// Any other construct. Traversed, never analyzed.
    Other {
        /// Frontend-specific kind name, for logging.
        kind: String,
        /// Child nodes in source order.
        children: Vec<NodeId>,
    },
}

/// A node: kind plus source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// What the node is.
    pub kind: NodeKind,
    /// Where the node is.
    pub span: Span,
}

/// How a call names the function it calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee<'t> {
    /// `name(...)`
    Name(&'t str),
    /// `a.b.name(...)`, outermost component first.
    Attribute(Vec<&'t str>),
    /// Anything else (`f()()`, `x[0]()`, ...).
    Dynamic,
}

impl<'t> Callee<'t> {
    /// Returns the last name component of the callee.
    #[must_use]
    pub fn terminal_name(&self) -> Option<&'t str> {
        match self {
            Self::Name(name) => Some(*name),
            Self::Attribute(path) => path.last().copied(),
            Self::Dynamic => None,
        }
    }
}

/// Syntax tree of one source unit.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its handle.
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode { kind, span });
        id
    }

    /// Marks `id` as the root of the tree.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Returns the root, if one was set.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Returns the node behind `id`, or `None` for a foreign id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    /// Direct children of `id`, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            NodeKind::Tuple { elements } | NodeKind::Sequence { elements } => elements.clone(),
            NodeKind::Call {
                func,
                arguments,
                keywords,
            } => std::iter::once(*func)
                .chain(arguments.iter().copied())
                .chain(keywords.iter().map(|k| k.value))
                .collect(),
            NodeKind::Mapping { entries } => entries
                .iter()
                .flat_map(|e| e.key.into_iter().chain(std::iter::once(e.value)))
                .collect(),
            NodeKind::Attribute { value, .. } | NodeKind::Starred { value } => vec![*value],
            NodeKind::Other { children, .. } => children.clone(),
            NodeKind::Literal { .. } | NodeKind::Identifier { .. } => Vec::new(),
        }
    }

    /// Returns true if `id` is a starred element.
    #[must_use]
    pub fn is_starred(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Starred { .. })
    }

    /// Resolves the callee of a call's `func` node.
    #[must_use]
    pub fn callee(&self, func: NodeId) -> Callee<'_> {
        match &self.node(func).kind {
            NodeKind::Identifier { name } => Callee::Name(name),
            NodeKind::Attribute { .. } => {
                let mut path = Vec::new();
                let mut current = func;
                loop {
                    match &self.node(current).kind {
                        NodeKind::Attribute { value, attr } => {
                            path.push(attr.as_str());
                            current = *value;
                        }
                        NodeKind::Identifier { name } => {
                            path.push(name.as_str());
                            break;
                        }
                        // `f().ValidationError(...)` still ends in a name
                        _ => break,
                    }
                }
                path.reverse();
                Callee::Attribute(path)
            }
            _ => Callee::Dynamic,
        }
    }
}
