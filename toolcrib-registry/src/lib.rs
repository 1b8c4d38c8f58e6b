//! Registry reconciliation.
//!
//! This crate owns the merge of a [`ToolDescriptor`] into the two-level
//! registry (enterprise -> tool), the derivation of release artifact
//! coordinates from a repository identity, and the byte-identical
//! persistence of the result to a primary location plus mirrors.
//!
//! Mirrors are never reconciled on their own: one serialization of the
//! authoritative value is written everywhere.

mod identity;
mod persist;
mod reconcile;

pub use identity::{RepoIdentity, infer_repo_identity, parse_remote_url};
pub use persist::{load_registry, persist_with_mirrors, serialize_registry};
pub use reconcile::{ReconcileError, ReconcileOutcome, derive_platforms, reconcile};
