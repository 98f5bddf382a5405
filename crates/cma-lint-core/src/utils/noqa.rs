//! flake8-style `# noqa` suppression comments.
//!
//! Supports directives like:
//! ```text
//! fields = (1, 2)  # noqa
//! fields = (1, 2)  # noqa: CMA100
//! raise ValidationError("x")  # NOQA:CMA200,CMA201
//! ```

/// A parsed `# noqa` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Noqa {
    /// Bare `# noqa`: every code on the line is suppressed.
    All,
    /// `# noqa: A, B`: only the listed codes (or code prefixes).
    Codes(Vec<String>),
}

impl Noqa {
    /// Returns true if this directive suppresses `code`.
    #[must_use]
    pub fn suppresses(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Codes(codes) => codes.iter().any(|c| strip_prefix_ci(code, c).is_some()),
        }
    }
}

/// Checks whether `line` carries a directive suppressing `code`.
#[must_use]
pub fn is_suppressed(line: &str, code: &str) -> bool {
    parse_noqa(line).is_some_and(|noqa| noqa.suppresses(code))
}

/// Parses the first `# noqa` directive on a physical line.
#[must_use]
pub fn parse_noqa(line: &str) -> Option<Noqa> {
    let mut rest = line;
    while let Some(hash) = rest.find('#') {
        let after = rest[hash + 1..].trim_start();
        if let Some(tail) = strip_prefix_ci(after, "noqa") {
            return Some(parse_codes(tail));
        }
        rest = &rest[hash + 1..];
    }
    None
}

fn parse_codes(tail: &str) -> Noqa {
    let Some(list) = tail.trim_start().strip_prefix(':') else {
        return Noqa::All;
    };

    let codes: Vec<String> = list
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .take_while(|s| s.is_empty() || is_code(s))
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
        .collect();

    if codes.is_empty() {
        Noqa::All
    } else {
        Noqa::Codes(codes)
    }
}

/// A code is letters followed by digits, e.g. `CMA100` or the prefix `CMA1`.
fn is_code(s: &str) -> bool {
    let letters = s.chars().take_while(char::is_ascii_alphabetic).count();
    letters > 0 && s.len() > letters && s[letters..].chars().all(|c| c.is_ascii_digit())
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_noqa() {
        assert_eq!(parse_noqa("x = (1, 2)  # noqa"), Some(Noqa::All));
        assert_eq!(parse_noqa("x = (1, 2)  #NOQA"), Some(Noqa::All));
    }

    #[test]
    fn test_noqa_with_codes() {
        assert_eq!(
            parse_noqa("x = (1, 2)  # noqa: CMA100, cma201"),
            Some(Noqa::Codes(vec!["CMA100".to_string(), "CMA201".to_string()]))
        );
        assert_eq!(
            parse_noqa("x = (1, 2)  # noqa:CMA100,CMA200"),
            Some(Noqa::Codes(vec!["CMA100".to_string(), "CMA200".to_string()]))
        );
    }

    #[test]
    fn test_codes_stop_at_prose() {
        assert_eq!(
            parse_noqa("x = 1  # noqa: CMA100 legacy tuple"),
            Some(Noqa::Codes(vec!["CMA100".to_string()]))
        );
    }

    #[test]
    fn test_no_directive() {
        assert_eq!(parse_noqa("x = (1, 2)  # regular comment"), None);
        assert_eq!(parse_noqa("x = (1, 2)"), None);
    }

    #[test]
    fn test_directive_after_other_comment_hash() {
        assert_eq!(parse_noqa("x = 1  # see #12 # noqa"), Some(Noqa::All));
    }

    #[test]
    fn test_prefix_match() {
        assert!(is_suppressed("raise E('x')  # noqa: CMA2", "CMA201"));
        assert!(is_suppressed("raise E('x')  # noqa: CMA2", "CMA200"));
        assert!(!is_suppressed("raise E('x')  # noqa: CMA2", "CMA100"));
    }

    #[test]
    fn test_empty_code_list_is_blanket() {
        assert_eq!(parse_noqa("x = 1  # noqa:"), Some(Noqa::All));
    }
}
