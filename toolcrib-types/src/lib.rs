//! Shared DTOs (schemas-as-code) for the toolcrib workspace.
//!
//! # Design constraints
//! - `registry.json` is persisted and mirrored; field order is fixed by
//!   struct declaration order and must not change casually.
//! - Reads are tolerant: optional fields may be absent, unknown fields
//!   are ignored. Writers should emit the full shape.

pub mod registry;
pub mod spec;
pub mod status;

/// Schema identifiers.
pub mod schema {
    pub const REGISTRY_SOURCE: &str = "toolcrib";
}
