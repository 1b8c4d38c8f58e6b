use crate::identity::RepoIdentity;
use chrono::Utc;
use thiserror::Error;
use toolcrib_types::registry::{Enterprise, PlatformArtifact, Platforms, Registry, ToolEntry};
use toolcrib_types::schema::REGISTRY_SOURCE;
use toolcrib_types::spec::ToolDescriptor;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A tool with this id already exists in the enterprise and no
    /// update intent was given. The registry value is left untouched.
    #[error("tool '{tool_id}' already exists in enterprise '{enterprise_id}'; pass update intent to overwrite")]
    DuplicateEntry {
        enterprise_id: String,
        tool_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Entry appended to the enterprise's tool list.
    Created,
    /// Entry replaced in place, preserving its position among siblings.
    Updated,
}

/// Merge `descriptor` into `registry`.
///
/// Registry-level metadata (generation date, source tag) is refreshed
/// unconditionally. The enterprise is created when absent; an existing
/// enterprise keeps its id but takes a non-empty differing display
/// name (last writer wins on metadata).
///
/// Artifact filenames are always derived; URLs are empty when
/// `identity` is `None`. An unresolvable identity never fails the
/// merge — callers surface it as an advisory.
pub fn reconcile(
    registry: &mut Registry,
    descriptor: &ToolDescriptor,
    identity: Option<&RepoIdentity>,
    update_existing: bool,
) -> Result<ReconcileOutcome, ReconcileError> {
    registry.generated_at = Utc::now().date_naive().to_string();
    registry.source = REGISTRY_SOURCE.to_string();

    let group_idx = match registry
        .enterprises
        .iter()
        .position(|e| e.id == descriptor.enterprise_id)
    {
        Some(idx) => idx,
        None => {
            debug!(enterprise = %descriptor.enterprise_id, "creating enterprise group");
            registry.enterprises.push(Enterprise {
                id: descriptor.enterprise_id.clone(),
                name: descriptor.enterprise_name.clone(),
                tools: vec![],
            });
            registry.enterprises.len() - 1
        }
    };
    let enterprise = &mut registry.enterprises[group_idx];
    if !descriptor.enterprise_name.is_empty() && enterprise.name != descriptor.enterprise_name {
        enterprise.name = descriptor.enterprise_name.clone();
    }

    let entry = ToolEntry {
        id: descriptor.tool_id.clone(),
        name: descriptor.tool_name.clone(),
        version: descriptor.version.clone(),
        description: descriptor.description.clone(),
        platforms: derive_platforms(descriptor, identity),
    };

    let existing = enterprise
        .tools
        .iter()
        .position(|t| t.id == descriptor.tool_id);
    match existing {
        Some(_) if !update_existing => Err(ReconcileError::DuplicateEntry {
            enterprise_id: descriptor.enterprise_id.clone(),
            tool_id: descriptor.tool_id.clone(),
        }),
        Some(idx) => {
            enterprise.tools[idx] = entry;
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            enterprise.tools.push(entry);
            Ok(ReconcileOutcome::Created)
        }
    }
}

/// Deterministic artifact names and download URLs for both platforms.
pub fn derive_platforms(
    descriptor: &ToolDescriptor,
    identity: Option<&RepoIdentity>,
) -> Platforms {
    let artifact = |platform: &str| {
        let asset = format!(
            "{}-{}-{}-{platform}.zip",
            descriptor.enterprise_id, descriptor.tool_id, descriptor.version
        );
        let url = match identity {
            Some(identity) => format!("{}/{asset}", identity.release_base_url()),
            None => String::new(),
        };
        PlatformArtifact { asset, url }
    };
    Platforms {
        macos: artifact("macos"),
        windows: artifact("windows"),
    }
}
