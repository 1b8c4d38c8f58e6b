use camino::Utf8Path;
use std::process::Command;
use tracing::debug;

/// GitHub repository identity in `owner/name` form. Release artifact
/// URLs hang off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    slug: String,
}

impl RepoIdentity {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn release_base_url(&self) -> String {
        format!("https://github.com/{}/releases/latest/download", self.slug)
    }
}

/// Best-effort identity from the git `origin` remote.
///
/// Returns `None` when git is unavailable, the directory has no origin
/// remote, or the remote is not a recognizable GitHub URL. Never an
/// error: an unresolvable identity is an advisory condition.
pub fn infer_repo_identity(repo_root: &Utf8Path) -> Option<RepoIdentity> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(repo_root)
        .output()
        .ok()?;
    if !output.status.success() {
        debug!("git config remote.origin.url failed; no repo identity");
        return None;
    }
    let remote = String::from_utf8(output.stdout).ok()?;
    parse_remote_url(remote.trim()).map(RepoIdentity::new)
}

/// Extract `owner/name` from the GitHub remote URL forms we accept.
pub fn parse_remote_url(remote: &str) -> Option<String> {
    let slug = remote
        .strip_prefix("git@github.com:")
        .or_else(|| remote.strip_prefix("https://github.com/"))
        .or_else(|| remote.strip_prefix("ssh://git@github.com/"))?;
    let slug = slug.strip_suffix(".git").unwrap_or(slug);
    if slug.contains('/') {
        Some(slug.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_remote_forms() {
        for remote in [
            "git@github.com:acme/tools.git",
            "https://github.com/acme/tools.git",
            "https://github.com/acme/tools",
            "ssh://git@github.com/acme/tools.git",
        ] {
            assert_eq!(parse_remote_url(remote).as_deref(), Some("acme/tools"), "{remote}");
        }
    }

    #[test]
    fn rejects_foreign_and_malformed_remotes() {
        assert_eq!(parse_remote_url("https://gitlab.com/acme/tools.git"), None);
        assert_eq!(parse_remote_url("git@github.com:justowner.git"), None);
        assert_eq!(parse_remote_url(""), None);
    }

    #[test]
    fn release_base_url_shape() {
        let id = RepoIdentity::new("acme/tools");
        assert_eq!(
            id.release_base_url(),
            "https://github.com/acme/tools/releases/latest/download"
        );
    }
}
