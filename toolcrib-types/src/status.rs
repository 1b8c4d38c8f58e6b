use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of patching one tool directory.
///
/// Skips are not errors: batch drivers report them and keep going. The
/// variants distinguish "wrong kind of project" from "expected files
/// missing" so summaries can say which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    /// Font assets and document patches were applied (or confirmed).
    Applied,
    /// Target is not a Flutter project; nothing to do here.
    SkippedNotFlutter,
    /// Target looks right but a required file (pubspec, main source) is
    /// absent.
    SkippedMissingFiles,
    /// The bundle yielded no usable font files.
    SkippedNoFonts,
}

impl PatchStatus {
    pub fn is_applied(self) -> bool {
        matches!(self, PatchStatus::Applied)
    }
}

impl fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatchStatus::Applied => "applied",
            PatchStatus::SkippedNotFlutter => "skip (non-Flutter)",
            PatchStatus::SkippedMissingFiles => "skip (missing files)",
            PatchStatus::SkippedNoFonts => "skip (no fonts)",
        };
        f.write_str(s)
    }
}

/// Non-fatal conditions collected during an operation and surfaced to
/// the caller instead of aborting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Advisory {
    /// The source document had no recognizable anchor; the declaration
    /// step was skipped.
    MissingAnchor { path: String },
    /// No repository identity could be resolved; derived URLs are empty.
    UnresolvableIdentity,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MissingAnchor { path } => {
                write!(f, "no anchor found in {path}; declaration not inserted")
            }
            Advisory::UnresolvableIdentity => {
                f.write_str("could not resolve repository identity; release URLs left empty")
            }
        }
    }
}
