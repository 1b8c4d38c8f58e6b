//! Change-set resolution and CI matrix construction.
//!
//! Given a before/after revision pair, work out which tool descriptors
//! are affected (diffing changed paths against the tenant path
//! convention, falling back to a full scan), then expand each affected
//! tool into per-platform build matrix entries.

mod changeset;
mod matrix;
mod ports;

pub use changeset::{ChangeSet, ResolveReason, ZERO_SHA, resolve, scan_tool_specs, tool_from_path};
pub use matrix::{Matrix, MatrixEntry, build_matrix, write_github_output};
pub use ports::{GitRevisions, RevisionPort};
