/// An ordered sequence of lines with index-based mutation.
///
/// Owned exclusively by the operation processing one file; loaded from
/// bytes, mutated in memory, rendered back with [`TextDocument::render`]
/// and discarded. Rendering always terminates the output with exactly
/// one trailing newline regardless of how many insertions occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
}

impl TextDocument {
    pub fn parse(contents: &str) -> Self {
        Self {
            lines: contents.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// Insert `new_lines` before `index`. `index == len` appends.
    pub fn insert_at<I, S>(&mut self, index: usize, new_lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut at = index;
        for line in new_lines {
            self.lines.insert(at, line.into());
            at += 1;
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// True if any line contains `marker` as a substring.
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.lines.iter().any(|line| line.contains(marker))
    }

    /// Leading-whitespace width of `line` in characters.
    pub fn indent_width(line: &str) -> usize {
        line.len() - line.trim_start().len()
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_appends_single_trailing_newline() {
        let doc = TextDocument::parse("a\nb");
        assert_eq!(doc.render(), "a\nb\n");
        let doc = TextDocument::parse("a\nb\n");
        assert_eq!(doc.render(), "a\nb\n");
    }

    #[test]
    fn insert_before_and_append() {
        let mut doc = TextDocument::parse("a\nc\n");
        doc.insert_at(1, ["b"]);
        assert_eq!(doc.render(), "a\nb\nc\n");
        doc.insert_at(doc.len(), ["d", "e"]);
        assert_eq!(doc.render(), "a\nb\nc\nd\ne\n");
    }

    #[test]
    fn indent_width_counts_leading_whitespace() {
        assert_eq!(TextDocument::indent_width("    four"), 4);
        assert_eq!(TextDocument::indent_width("none"), 0);
        assert_eq!(TextDocument::indent_width(""), 0);
    }
}
