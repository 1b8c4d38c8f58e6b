use anyhow::Context;
use camino::Utf8PathBuf;
use std::process::Command;

/// Revision queries. Abstracted so change-set resolution can be tested
/// against an in-memory implementation.
pub trait RevisionPort {
    /// Paths touched between two revisions, relative to the repo root.
    /// May fail (unknown revision, shallow clone); callers are expected
    /// to fall back to a full scan.
    fn changed_paths(&self, before: &str, after: &str) -> anyhow::Result<Vec<String>>;
}

/// `git diff --name-only` backed implementation.
#[derive(Debug, Clone)]
pub struct GitRevisions {
    repo_root: Utf8PathBuf,
}

impl GitRevisions {
    pub fn new(repo_root: Utf8PathBuf) -> Self {
        Self { repo_root }
    }
}

impl RevisionPort for GitRevisions {
    fn changed_paths(&self, before: &str, after: &str) -> anyhow::Result<Vec<String>> {
        let output = Command::new("git")
            .args(["diff", "--name-only", before, after])
            .current_dir(&self.repo_root)
            .output()
            .context("run git diff")?;
        if !output.status.success() {
            anyhow::bail!(
                "git diff --name-only {before} {after} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let stdout = String::from_utf8(output.stdout).context("git diff output not utf-8")?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
