//! Whole-document rewriting.

use crate::catalog::TagCatalog;
use crate::rewriter::rewrite_line;

/// A template held as lines, rewritten top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl Document {
    /// Split `text` on `\n`. Carriage returns stay attached to their line.
    pub fn from_text(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let trailing_newline = body.len() != text.len();
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(str::to_string).collect()
        };

        Self {
            lines,
            trailing_newline,
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            trailing_newline: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rewrite every cataloged short form in place. Returns how many lines
    /// changed.
    pub fn rewrite(&mut self, catalog: &TagCatalog) -> usize {
        rewrite_lines(&mut self.lines, catalog)
    }

    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }
}

/// Rewrite a line sequence in place with a one-line lookahead cursor.
///
/// Each line is rewritten while its successor is still untouched, so the
/// lookahead always sees the successor as written. Returns the number of
/// changed lines.
pub fn rewrite_lines(lines: &mut [String], catalog: &TagCatalog) -> usize {
    let mut changed = 0;
    let mut rest = lines;

    while let Some((current, tail)) = std::mem::take(&mut rest).split_first_mut() {
        let lookahead = tail.first().map(String::as_str);
        let rewritten = rewrite_line(current, lookahead, catalog);
        if rewritten != *current {
            *current = rewritten;
            changed += 1;
        }
        rest = tail;
    }

    if changed > 0 {
        tracing::debug!(changed, "Rewrote short-form tags");
    }
    changed
}

/// Rewrite a template's text with the standard catalog.
pub fn elongate(text: &str) -> String {
    let mut document = Document::from_text(text);
    document.rewrite(TagCatalog::standard());
    document.to_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip_keeps_trailing_newline() {
        let text = "a: 1\nb: 2\n";
        assert_eq!(Document::from_text(text).to_text(), text);
        assert_eq!(Document::from_text("a: 1").to_text(), "a: 1");
        assert_eq!(Document::from_text("").lines().len(), 0);
        assert_eq!(Document::from_text("\n").lines(), &[String::new()]);
    }

    #[test]
    fn test_rewrite_counts_changed_lines() {
        let mut document = Document::from_text("A: !Ref X\nB: plain\nC: !GetAZs ''\n");
        assert_eq!(document.rewrite(TagCatalog::standard()), 2);
        assert_eq!(
            document.to_text(),
            "A: \"Ref\": X\nB: plain\nC: \"Fn::GetAZs\": ''\n"
        );
    }

    #[test]
    fn test_lookahead_sees_original_successor() {
        let mut lines = vec![
            "  - !Ref A".to_string(),
            "  - !Ref B".to_string(),
        ];
        rewrite_lines(&mut lines, TagCatalog::standard());
        assert_eq!(lines[0], "  - \"Ref\" A");
        assert_eq!(lines[1], "  - \"Ref\": B");
    }
}
