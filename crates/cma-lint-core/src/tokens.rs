//! Lexical tokens and the end-position index over them.

use crate::checker::CheckError;
use crate::syntax::Position;
use std::collections::HashMap;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Boundary token at index 0.
    StreamStart,
    /// `,`
    Comma,
    /// End of a logical line.
    Newline,
    /// Line break inside brackets or on a blank line.
    Nl,
    /// `# ...`
    Comment,
    /// Indentation increase.
    Indent,
    /// Indentation decrease.
    Dedent,
    /// End of input.
    EndMarker,
    /// Any other token.
    Other,
}

impl TokenKind {
    /// Tokens skipped when looking for the separator before a closing token.
    ///
    /// Comments count as insignificant alongside the line and indentation
    /// markers, so `(1, 2,  # note` followed by `)` keeps its separator.
    #[must_use]
    pub fn is_insignificant(self) -> bool {
        matches!(
            self,
            Self::Newline | Self::Nl | Self::Comment | Self::Indent | Self::Dedent
        )
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: String,
    /// Position of the first character.
    pub start: Position,
    /// Position just past the last character.
    pub end: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }
}

/// Random-access view over a token stream, keyed by end position.
#[derive(Debug)]
pub struct TokenIndex<'a> {
    tokens: &'a [Token],
    by_end: HashMap<Position, usize>,
}

impl<'a> TokenIndex<'a> {
    /// Indexes `tokens`. When several tokens share an end position the
    /// first one wins.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut by_end = HashMap::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            by_end.entry(token.end).or_insert(idx);
        }
        Self { tokens, by_end }
    }

    /// Returns the indexed tokens.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Index of the first token ending at `end`.
    #[must_use]
    pub fn position_of(&self, end: Position) -> Option<usize> {
        self.by_end.get(&end).copied()
    }

    /// Returns true if the token at `idx` is preceded by a comma, ignoring
    /// insignificant tokens. Walking back to index 0 passes vacuously.
    #[must_use]
    pub fn preceded_by_separator(&self, mut idx: usize) -> bool {
        while idx > 1 {
            idx -= 1;
            let token = &self.tokens[idx];
            if token.kind.is_insignificant() {
                continue;
            }
            return token.kind == TokenKind::Comma;
        }
        true
    }

    /// Checks whether the construct closing at `end` carries a trailing
    /// separator.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::UnmatchedPosition`] if no token ends at `end`.
    pub fn closes_with_separator(&self, end: Position) -> Result<bool, CheckError> {
        let idx = self.position_of(end).ok_or(CheckError::UnmatchedPosition {
            line: end.line,
            column: end.column,
        })?;
        // Unparenthesized tuples end on their own trailing comma.
        if self.tokens[idx].kind == TokenKind::Comma {
            return Ok(true);
        }
        Ok(self.preceded_by_separator(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use TokenKind::{Comma, Comment, Dedent, Nl, Other, StreamStart};

    fn tok(kind: TokenKind, text: &str, start: (usize, usize), end: (usize, usize)) -> Token {
        Token::new(
            kind,
            text,
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
        )
    }

    /// Lays tokens out back to back on line 1, after the boundary token.
    fn line(parts: &[(TokenKind, &str)]) -> Vec<Token> {
        let mut tokens = vec![tok(StreamStart, "", (0, 0), (0, 0))];
        let mut col = 0;
        for (kind, text) in parts {
            let end = col + text.len();
            tokens.push(tok(*kind, text, (1, col), (1, end)));
            col = end;
        }
        tokens
    }

    #[test]
    fn test_missing_separator() {
        let tokens = line(&[
            (Other, "("),
            (Other, "1"),
            (Comma, ","),
            (Other, "2"),
            (Other, ")"),
        ]);
        let index = TokenIndex::new(&tokens);
        assert_eq!(index.closes_with_separator(Position::new(1, 5)), Ok(false));
    }

    #[test]
    fn test_present_separator() {
        let tokens = line(&[(Other, "("), (Other, "1"), (Comma, ","), (Other, ")")]);
        let index = TokenIndex::new(&tokens);
        assert_eq!(index.closes_with_separator(Position::new(1, 4)), Ok(true));
    }

    #[test]
    fn test_skips_insignificant_tokens() {
        let tokens = vec![
            tok(StreamStart, "", (0, 0), (0, 0)),
            tok(Other, "(", (1, 0), (1, 1)),
            tok(Nl, "\n", (1, 1), (1, 2)),
            tok(Other, "'a'", (2, 4), (2, 7)),
            tok(Comma, ",", (2, 7), (2, 8)),
            tok(Comment, "# x", (2, 9), (2, 12)),
            tok(Nl, "\n", (2, 12), (2, 13)),
            tok(Other, ")", (3, 0), (3, 1)),
        ];
        let index = TokenIndex::new(&tokens);
        assert_eq!(index.closes_with_separator(Position::new(3, 1)), Ok(true));
    }

    #[test]
    fn test_start_of_stream_passes() {
        let tokens = line(&[(Other, "x")]);
        let index = TokenIndex::new(&tokens);
        assert!(index.preceded_by_separator(0));
        // Token 0 is the boundary itself and is never inspected.
        assert!(index.preceded_by_separator(1));
    }

    #[test]
    fn test_walk_through_insignificant_tokens_to_start_passes() {
        let tokens = line(&[(Comment, "# c"), (Nl, "\n"), (Other, ")")]);
        let index = TokenIndex::new(&tokens);
        assert!(index.preceded_by_separator(3));
        assert_eq!(index.closes_with_separator(Position::new(1, 5)), Ok(true));
    }

    #[test]
    fn test_trailing_comma_token_is_separator() {
        let tokens = line(&[(Other, "1"), (Comma, ","), (Other, "2"), (Comma, ",")]);
        let index = TokenIndex::new(&tokens);
        assert_eq!(index.closes_with_separator(Position::new(1, 4)), Ok(true));
    }

    #[test]
    fn test_unmatched_position_is_error() {
        let tokens = line(&[(Other, "x")]);
        let index = TokenIndex::new(&tokens);
        assert_eq!(
            index.closes_with_separator(Position::new(7, 3)),
            Err(CheckError::UnmatchedPosition { line: 7, column: 3 })
        );
    }

    #[test]
    fn test_first_token_wins_on_shared_end() {
        let tokens = vec![
            tok(Other, "x", (1, 0), (1, 1)),
            tok(Dedent, "", (1, 1), (1, 1)),
        ];
        let index = TokenIndex::new(&tokens);
        assert_eq!(index.position_of(Position::new(1, 1)), Some(0));
    }
}
