use crate::document::TextDocument;
use tracing::debug;

/// What to insert into a free-form source document and where.
///
/// All matching is substring- or prefix-based on raw lines; the marker
/// must be unique per logical declaration (callers guarantee this).
#[derive(Debug, Clone)]
pub struct DeclarationSpec<'a> {
    /// Token whose presence anywhere in the document means the patch
    /// already ran.
    pub unique_marker: &'a str,
    /// Enabling line that must be present exactly once (e.g. an
    /// import). Matched by line prefix.
    pub prerequisite: &'a str,
    /// Prefix identifying the prerequisite's family; the prerequisite
    /// is inserted after the last family member, or at the top when
    /// the family is empty.
    pub prerequisite_family: &'a str,
    /// Substring marking the insertion context.
    pub anchor: &'a str,
    /// Key whose presence near the anchor means a declaration already
    /// exists there. The same key elsewhere in the document does not
    /// count.
    pub declaration_key: &'a str,
    /// Declaration content, inserted one indent step below the anchor.
    pub declaration: &'a str,
    /// How many lines at and after the anchor to scan for
    /// `declaration_key`.
    pub lookahead: usize,
}

/// Default duplicate-check window, matching the historical behavior.
pub const DEFAULT_LOOKAHEAD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Marker found; nothing touched.
    AlreadyApplied,
    /// Declaration (and possibly the prerequisite) inserted.
    Inserted { prerequisite_added: bool },
    /// No anchor in the document. The prerequisite is still ensured;
    /// the declaration is optional decoration, not a required fix.
    NoAnchor { prerequisite_added: bool },
    /// A declaration with the same key already sits within the
    /// lookahead window of the anchor.
    DuplicateNearAnchor { prerequisite_added: bool },
}

impl AnchorOutcome {
    /// True if the document differs from its input.
    pub fn changed(self) -> bool {
        match self {
            AnchorOutcome::AlreadyApplied => false,
            AnchorOutcome::Inserted { .. } => true,
            AnchorOutcome::NoAnchor { prerequisite_added }
            | AnchorOutcome::DuplicateNearAnchor { prerequisite_added } => prerequisite_added,
        }
    }

    pub fn is_missing_anchor(self) -> bool {
        matches!(self, AnchorOutcome::NoAnchor { .. })
    }
}

/// Idempotently ensure a declaration line is present near its anchor.
pub fn ensure_declaration(doc: &mut TextDocument, spec: &DeclarationSpec<'_>) -> AnchorOutcome {
    if doc.contains_marker(spec.unique_marker) {
        return AnchorOutcome::AlreadyApplied;
    }

    let prerequisite_added = ensure_prerequisite(doc, spec);

    let Some(anchor_idx) = doc
        .lines()
        .iter()
        .position(|line| line.contains(spec.anchor))
    else {
        debug!(anchor = spec.anchor, "no anchor line; skipping declaration");
        return AnchorOutcome::NoAnchor { prerequisite_added };
    };

    let window_end = (anchor_idx + spec.lookahead).min(doc.len());
    let duplicate = doc.lines()[anchor_idx..window_end]
        .iter()
        .any(|line| line.contains(spec.declaration_key));
    if duplicate {
        return AnchorOutcome::DuplicateNearAnchor { prerequisite_added };
    }

    let indent = " ".repeat(TextDocument::indent_width(doc.line(anchor_idx)));
    doc.insert_at(anchor_idx + 1, [format!("{indent}  {}", spec.declaration)]);
    AnchorOutcome::Inserted { prerequisite_added }
}

fn ensure_prerequisite(doc: &mut TextDocument, spec: &DeclarationSpec<'_>) -> bool {
    if doc
        .lines()
        .iter()
        .any(|line| line.starts_with(spec.prerequisite))
    {
        return false;
    }

    let insert_at = doc
        .lines()
        .iter()
        .rposition(|line| line.starts_with(spec.prerequisite_family))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    doc.insert_at(insert_at, [spec.prerequisite]);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(lookahead: usize) -> DeclarationSpec<'static> {
        DeclarationSpec {
            unique_marker: "HarmonyOS Sans",
            prerequisite: "import 'dart:io';",
            prerequisite_family: "import ",
            anchor: "ThemeData(",
            declaration_key: "fontFamily:",
            declaration: "fontFamily: Platform.isWindows ? 'HarmonyOS Sans' : null,",
            lookahead,
        }
    }

    #[test]
    fn prerequisite_goes_after_last_import() {
        let mut doc = TextDocument::parse("import 'a.dart';\nimport 'b.dart';\n\nvoid main() {}\n");
        ensure_declaration(&mut doc, &spec(DEFAULT_LOOKAHEAD));
        assert_eq!(doc.line(2), "import 'dart:io';");
    }

    #[test]
    fn prerequisite_goes_to_top_without_imports() {
        let mut doc = TextDocument::parse("void main() {}\n");
        let out = ensure_declaration(&mut doc, &spec(DEFAULT_LOOKAHEAD));
        assert_eq!(doc.line(0), "import 'dart:io';");
        assert!(out.is_missing_anchor());
        assert!(out.changed());
    }

    #[test]
    fn duplicate_key_beyond_window_does_not_count() {
        // fontFamily for an unrelated widget far below the anchor.
        let mut src = String::from("      theme: ThemeData(\n");
        for _ in 0..12 {
            src.push_str("        primarySwatch: Colors.blue,\n");
        }
        src.push_str("      other: TextStyle(fontFamily: 'Mono'),\n");
        let mut doc = TextDocument::parse(&src);
        let out = ensure_declaration(&mut doc, &spec(DEFAULT_LOOKAHEAD));
        assert!(matches!(out, AnchorOutcome::Inserted { .. }));
    }

    #[test]
    fn duplicate_key_inside_window_counts() {
        let mut doc = TextDocument::parse(
            "      theme: ThemeData(\n        fontFamily: 'Custom',\n      ),\n",
        );
        let out = ensure_declaration(&mut doc, &spec(DEFAULT_LOOKAHEAD));
        assert!(matches!(out, AnchorOutcome::DuplicateNearAnchor { .. }));
    }

    #[test]
    fn window_is_configurable() {
        let mut doc = TextDocument::parse(
            "theme: ThemeData(\n  a,\n  b,\n  fontFamily: 'Custom',\n),\n",
        );
        // Window of 2 lines does not reach the existing declaration.
        let out = ensure_declaration(&mut doc, &spec(2));
        assert!(matches!(out, AnchorOutcome::Inserted { .. }));
    }
}
