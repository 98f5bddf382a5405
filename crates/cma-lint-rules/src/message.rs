//! Message argument inspection for CMA200 and CMA201.
//!
//! A message argument is classified by shape. Mappings contribute their
//! values, sequences and tuples their elements. Calls and plain literals are
//! leaves; everything else cannot be resolved and is skipped.

use crate::visitor::Collected;
use cma_lint_core::{
    CheckConfig, Finding, LiteralValue, NodeId, NodeKind, Position, RuleCode, SyntaxTree,
};
use tracing::trace;

pub(crate) struct MessageInspector<'a> {
    tree: &'a SyntaxTree,
    settings: &'a CheckConfig,
}

impl<'a> MessageInspector<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, settings: &'a CheckConfig) -> Self {
        Self { tree, settings }
    }

    /// Inspects the message passed to `constructor`, appending findings.
    pub(crate) fn inspect(&self, message: NodeId, constructor: &str, out: &mut Collected) {
        let mut work = vec![message];
        while let Some(id) = work.pop() {
            let node = self.tree.node(id);
            match &node.kind {
                NodeKind::Mapping { entries } => work.extend(
                    entries
                        .iter()
                        .rev()
                        .filter(|e| e.key.is_some())
                        .map(|e| e.value),
                ),
                NodeKind::Sequence { elements } | NodeKind::Tuple { elements } => {
                    work.extend(elements.iter().rev().copied());
                }
                NodeKind::Call {
                    func, arguments, ..
                } => {
                    let wrapped = self
                        .tree
                        .callee(*func)
                        .terminal_name()
                        .is_some_and(|name| self.settings.is_marker(name));
                    if !wrapped {
                        out.unwrapped.push(self.unwrapped(node.span.start, constructor));
                    }
                    let text = arguments.first().and_then(|&arg| self.string_value(arg));
                    if text.is_some_and(|t| self.lacks_punctuation(t)) {
                        out.unpunctuated
                            .push(self.unpunctuated(node.span.end, constructor));
                    }
                }
                NodeKind::Literal { value } => {
                    out.unwrapped.push(self.unwrapped(node.span.start, constructor));
                    if value.as_str().is_some_and(|t| self.lacks_punctuation(t)) {
                        out.unpunctuated
                            .push(self.unpunctuated(node.span.end, constructor));
                    }
                }
                other => trace!("Cannot resolve message at {}: {:?}", node.span.start, other),
            }
        }
    }

    fn string_value(&self, id: NodeId) -> Option<&'a str> {
        match &self.tree.node(id).kind {
            NodeKind::Literal {
                value: LiteralValue::Str(text),
            } => Some(text),
            _ => None,
        }
    }

    fn lacks_punctuation(&self, text: &str) -> bool {
        text.chars()
            .last()
            .is_some_and(|c| c != self.settings.terminal_punctuation)
    }

    fn unwrapped(&self, position: Position, constructor: &str) -> Finding {
        Finding::new(
            position,
            RuleCode::MessageNotWrapped,
            format!(
                "message of {constructor} should be wrapped in `{}`",
                self.settings.primary_marker()
            ),
        )
    }

    fn unpunctuated(&self, position: Position, constructor: &str) -> Finding {
        Finding::new(
            position,
            RuleCode::MessageMissingTerminalPunctuation,
            format!(
                "message of {constructor} should end with {}",
                self.settings.punctuation_label()
            ),
        )
    }
}
