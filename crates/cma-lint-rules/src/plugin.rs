//! Rule orchestration over one source unit.

use crate::emitter::Emitter;
use crate::visitor::{self, Collected};
use crate::TRAILING_COMMA_MESSAGE;
use cma_lint_core::{
    CheckConfig, CheckError, Finding, PluginIdentity, Report, RuleCode, SyntaxTree, Token,
    TokenIndex,
};
use tracing::debug;

/// Name and version every report is attributed to.
pub const IDENTITY: PluginIdentity = PluginIdentity {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

/// Runs all three rules over one tree and its token stream.
///
/// Findings come out grouped by rule: CMA201, then CMA200, then CMA100.
/// Within a rule they keep document order.
#[derive(Debug)]
pub struct Plugin<'a> {
    tree: &'a SyntaxTree,
    index: TokenIndex<'a>,
    settings: &'a CheckConfig,
    emitter: Emitter,
}

impl<'a> Plugin<'a> {
    /// Creates a plugin over `tree` and the `tokens` of the same source.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree, tokens: &'a [Token], settings: &'a CheckConfig) -> Self {
        Self {
            tree,
            index: TokenIndex::new(tokens),
            settings,
            emitter: Emitter::new(IDENTITY),
        }
    }

    /// Returns the reporter identity.
    #[must_use]
    pub fn identity(&self) -> PluginIdentity {
        self.emitter.identity()
    }

    /// Yields every finding.
    ///
    /// Tuple closings are checked against the token stream as they are
    /// yielded. A closing with no matching token yields an error and ends
    /// the sequence.
    pub fn findings(&self) -> impl Iterator<Item = Result<Finding, CheckError>> + '_ {
        let Collected {
            closings,
            unpunctuated,
            unwrapped,
        } = visitor::collect(self.tree, self.settings);

        debug!(
            "Collected {} unwrapped, {} unpunctuated messages and {} tuple closings",
            unwrapped.len(),
            unpunctuated.len(),
            closings.len()
        );

        let missing_commas = closings.into_iter().filter_map(move |end| {
            match self.index.closes_with_separator(end) {
                Ok(true) => None,
                Ok(false) => Some(Ok(Finding::new(
                    end,
                    RuleCode::MissingTrailingComma,
                    TRAILING_COMMA_MESSAGE,
                ))),
                Err(e) => Some(Err(e)),
            }
        });

        unwrapped
            .into_iter()
            .map(Ok)
            .chain(unpunctuated.into_iter().map(Ok))
            .chain(missing_commas)
            .scan(false, |failed, item| {
                if *failed {
                    return None;
                }
                *failed = item.is_err();
                Some(item)
            })
    }

    /// Yields one report per finding, in [`findings`](Self::findings) order.
    pub fn run(&self) -> impl Iterator<Item = Result<Report, CheckError>> + '_ {
        self.findings()
            .map(|item| item.map(|finding| self.emitter.report(&finding)))
    }
}
