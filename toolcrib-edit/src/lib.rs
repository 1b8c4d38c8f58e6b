//! Idempotent structural edits to semi-structured text documents.
//!
//! This crate owns the edit semantics only. It never touches the
//! filesystem: callers hand in document contents as a string and write
//! the result back themselves, atomically, after the whole operation
//! succeeds.
//!
//! Two patchers live here:
//! - [`ensure_nested_block`] inserts a structured fragment into a named
//!   block of an indentation-delimited document (pubspec-style YAML)
//!   exactly once.
//! - [`ensure_declaration`] inserts a single declaration line next to a
//!   recognizable anchor in a free-form source document, exactly once.
//!
//! Both detect prior application by a caller-chosen unique marker
//! substring, not by structural comparison, so re-running a patch is
//! always a byte-identical no-op.

mod anchor;
mod block;
mod document;

pub use anchor::{AnchorOutcome, DEFAULT_LOOKAHEAD, DeclarationSpec, ensure_declaration};
pub use block::{BlockOutcome, Indent, block_end, ensure_nested_block, find_block};
pub use document::TextDocument;
