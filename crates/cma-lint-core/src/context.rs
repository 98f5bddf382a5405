//! Per-file context used while turning findings into violations.

use std::path::{Path, PathBuf};

/// Metadata about the source file being analyzed.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Returns the text of a 1-indexed line, if it exists.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&'a str> {
        line.checked_sub(1)
            .and_then(|idx| self.content.lines().nth(idx))
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len();
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(content: &str) -> FileContext<'_> {
        FileContext::new(Path::new("/repo/app/forms.py"), content, Path::new("/repo"))
    }

    #[test]
    fn test_relative_path() {
        let content = "";
        assert_eq!(ctx(content).relative_path, PathBuf::from("app/forms.py"));

        let outside = FileContext::new(Path::new("/elsewhere/x.py"), content, Path::new("/repo"));
        assert_eq!(outside.relative_path, PathBuf::from("/elsewhere/x.py"));
    }

    #[test]
    fn test_line_lookup() {
        let content = "a = 1\nb = (1, 2)\n";
        assert_eq!(ctx(content).line(2), Some("b = (1, 2)"));
        assert_eq!(ctx(content).line(0), None);
        assert_eq!(ctx(content).line(5), None);
    }

    #[test]
    fn test_offset_calculation() {
        let content = "line1\r\nline2\nline3";
        let ctx = ctx(content);

        assert_eq!(ctx.offset_for(1, 1), 0); // Start of line 1
        assert_eq!(ctx.offset_for(2, 1), 7); // Start of line 2, after CRLF
        assert_eq!(ctx.offset_for(3, 3), 15); // "ne" in line3
    }
}
