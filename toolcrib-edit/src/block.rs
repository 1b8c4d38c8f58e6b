use crate::document::TextDocument;
use tracing::debug;

/// Index of the first line whose trimmed content is `name` followed by
/// the block-opening `:`. Matching is exact on trimmed text; no
/// indentation is assumed at find time.
pub fn find_block(doc: &TextDocument, name: &str) -> Option<usize> {
    let opener = format!("{name}:");
    doc.lines().iter().position(|line| line.trim() == opener)
}

/// Exclusive end index of the block starting at `start`.
///
/// Blank and comment lines are never boundary candidates. The first
/// substantive line whose indentation is <= the start line's terminates
/// the block; a block followed only by blanks and comments extends to
/// the end of the document.
pub fn block_end(doc: &TextDocument, start: usize) -> usize {
    let base_indent = TextDocument::indent_width(doc.line(start));
    for i in (start + 1)..doc.len() {
        let line = doc.line(i);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if TextDocument::indent_width(line) <= base_indent {
            return i;
        }
    }
    doc.len()
}

/// Indentation scheme for fragments inserted into a block: a fixed
/// two-space step per level relative to the host block's own indent.
#[derive(Debug, Clone, Copy)]
pub struct Indent {
    base: usize,
}

impl Indent {
    /// Indentation string for child content `level` steps below the
    /// host block line.
    pub fn child(&self, level: usize) -> String {
        " ".repeat(self.base + 2 * level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Fragment inserted; document changed.
    Inserted,
    /// Marker already present; document unchanged by this call.
    AlreadyPresent,
}

/// Ensure a structured fragment exists inside the named top-level block.
///
/// Prior application is detected by `marker`, a substring unique to the
/// fragment (callers must guarantee uniqueness); when present the
/// document is left untouched. Otherwise the block is synthesized at
/// the end of the document when absent, and the fragment is built by
/// `build` against the host block's [`Indent`] and inserted as the
/// block's last child content, after a blank separator line.
pub fn ensure_nested_block<F>(
    doc: &mut TextDocument,
    block_name: &str,
    marker: &str,
    build: F,
) -> BlockOutcome
where
    F: FnOnce(&Indent) -> Vec<String>,
{
    if doc.contains_marker(marker) {
        return BlockOutcome::AlreadyPresent;
    }

    let start = match find_block(doc, block_name) {
        Some(idx) => idx,
        None => {
            debug!(block = block_name, "block absent; synthesizing");
            doc.push("");
            doc.push(format!("{block_name}:"));
            doc.len() - 1
        }
    };

    let end = block_end(doc, start);
    let indent = Indent {
        base: TextDocument::indent_width(doc.line(start)),
    };

    let mut fragment = vec![String::new()];
    fragment.extend(build(&indent));
    doc.insert_at(end, fragment);
    BlockOutcome::Inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn find_block_matches_trimmed_opener() {
        let doc = TextDocument::parse("name: x\nflutter:\n  a: 1\n");
        assert_eq!(find_block(&doc, "flutter"), Some(1));
        assert_eq!(find_block(&doc, "name"), None);
        assert_eq!(find_block(&doc, "missing"), None);
    }

    #[test]
    fn block_end_stops_at_sibling() {
        let doc = TextDocument::parse("flutter:\n  a: 1\n  b: 2\nother:\n  c: 3\n");
        assert_eq!(block_end(&doc, 0), 3);
    }

    #[test]
    fn block_end_skips_blanks_and_comments() {
        let doc = TextDocument::parse("flutter:\n  a: 1\n\n# note\n  b: 2\nother: x\n");
        assert_eq!(block_end(&doc, 0), 5);
    }

    #[test]
    fn block_end_reaches_document_end() {
        let doc = TextDocument::parse("flutter:\n  a: 1\n\n# trailing comment\n");
        assert_eq!(block_end(&doc, 0), 4);
    }

    #[test]
    fn nested_block_end_respects_outer_indent() {
        let doc = TextDocument::parse("top:\n  inner:\n    x: 1\n  sibling: 2\n");
        assert_eq!(block_end(&doc, 1), 3);
    }
}
