use crate::ports::RevisionPort;
use camino::{Utf8Path, Utf8PathBuf};
use glob::glob;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Sentinel "no base revision" SHA used by CI push events.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// The set of descriptor files considered dirty for this build, plus
/// how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Sorted `tool.yaml` paths relative to the repo root.
    pub specs: Vec<Utf8PathBuf>,
    pub reason: ResolveReason,
}

/// Why the change set has the shape it has. The diff-unavailable
/// fallback is a named policy: a complete matrix beats a failed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveReason {
    FullScanRequested,
    FullScanNoBase,
    FullScanDiffUnavailable,
    Diff,
}

/// Map a changed path to its `(enterprise, tool)` pair under the
/// `tenants/<enterprise>/tools/<tool>/...` convention.
pub fn tool_from_path(path: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = path.split('/').collect();
    let idx = parts.iter().position(|p| *p == "tenants")?;
    if parts.len() < idx + 4 || parts[idx + 2] != "tools" {
        return None;
    }
    Some((parts[idx + 1].to_string(), parts[idx + 3].to_string()))
}

/// Every descriptor under the convention root, sorted.
pub fn scan_tool_specs(repo_root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let pattern = repo_root.join("tenants/*/tools/*/tool.yaml");
    let mut out = BTreeSet::new();
    for entry in glob(pattern.as_str())? {
        let path = entry.map_err(|e| anyhow::anyhow!("scan tenants: {e}"))?;
        let utf8 = Utf8PathBuf::from_path_buf(path)
            .map_err(|p| anyhow::anyhow!("non-utf8 path: {}", p.display()))?;
        out.insert(utf8);
    }
    Ok(out.into_iter().collect())
}

/// Resolve the change set for a revision range.
///
/// `all` forces a full scan. A missing or zero `before` means there is
/// no base to diff against; a failing diff is recovered locally by
/// falling back to the full scan rather than propagating the failure.
pub fn resolve(
    repo_root: &Utf8Path,
    revisions: &dyn RevisionPort,
    all: bool,
    before: &str,
    after: &str,
) -> anyhow::Result<ChangeSet> {
    if all {
        return Ok(ChangeSet {
            specs: scan_tool_specs(repo_root)?,
            reason: ResolveReason::FullScanRequested,
        });
    }

    if before.is_empty() || before == ZERO_SHA {
        return Ok(ChangeSet {
            specs: scan_tool_specs(repo_root)?,
            reason: ResolveReason::FullScanNoBase,
        });
    }

    let changed = match revisions.changed_paths(before, after) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(%before, %after, "diff unavailable ({err:#}); falling back to full scan");
            return Ok(ChangeSet {
                specs: scan_tool_specs(repo_root)?,
                reason: ResolveReason::FullScanDiffUnavailable,
            });
        }
    };

    let mut specs = BTreeSet::new();
    for path in &changed {
        let Some((enterprise, tool)) = tool_from_path(path) else {
            continue;
        };
        let spec = repo_root
            .join("tenants")
            .join(&enterprise)
            .join("tools")
            .join(&tool)
            .join("tool.yaml");
        if spec.is_file() {
            specs.insert(spec);
        } else {
            debug!(%path, "changed path matches convention but descriptor is missing");
        }
    }

    Ok(ChangeSet {
        specs: specs.into_iter().collect(),
        reason: ResolveReason::Diff,
    })
}
