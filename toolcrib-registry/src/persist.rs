use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use toolcrib_types::registry::Registry;
use tracing::debug;

/// Read the registry, tolerating a missing file (fresh default).
pub fn load_registry(path: &Utf8Path) -> anyhow::Result<Registry> {
    if !path.exists() {
        debug!(%path, "registry absent; starting from empty");
        return Ok(Registry::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {path}"))
}

/// The single authoritative serialization: pretty JSON in struct field
/// order with a trailing newline. Mirrors must receive these exact
/// bytes.
pub fn serialize_registry(registry: &Registry) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(registry).context("serialize registry")?;
    out.push('\n');
    Ok(out)
}

/// Write the registry to `primary` and to every mirror that already
/// exists on disk, byte-for-byte identical. Returns the paths written.
pub fn persist_with_mirrors(
    registry: &Registry,
    primary: &Utf8Path,
    mirrors: &[Utf8PathBuf],
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let serialized = serialize_registry(registry)?;

    fs::write(primary, &serialized).with_context(|| format!("write {primary}"))?;
    let mut written = vec![primary.to_path_buf()];

    for mirror in mirrors {
        if !mirror.exists() {
            debug!(%mirror, "mirror absent; not created");
            continue;
        }
        fs::write(mirror, &serialized).with_context(|| format!("write mirror {mirror}"))?;
        written.push(mirror.clone());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use toolcrib_types::registry::Enterprise;

    fn sample() -> Registry {
        Registry {
            generated_at: "2026-08-30".to_string(),
            source: "toolcrib".to_string(),
            enterprises: vec![Enterprise {
                id: "acme".to_string(),
                name: "Acme".to_string(),
                tools: vec![],
            }],
        }
    }

    #[test]
    fn missing_registry_loads_as_default() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("registry.json")).unwrap();
        let reg = load_registry(&path).unwrap();
        assert!(reg.enterprises.is_empty());
    }

    #[test]
    fn mirrors_receive_identical_bytes() {
        let td = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let primary = root.join("registry.json");
        let mirror = root.join("mirror.json");
        fs::write(&mirror, "{}").unwrap();

        let written = persist_with_mirrors(&sample(), &primary, &[mirror.clone()]).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(&primary).unwrap(),
            fs::read_to_string(&mirror).unwrap()
        );
    }

    #[test]
    fn absent_mirror_is_not_created() {
        let td = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let primary = root.join("registry.json");
        let mirror = root.join("nope").join("mirror.json");

        let written = persist_with_mirrors(&sample(), &primary, &[mirror.clone()]).unwrap();
        assert_eq!(written, vec![primary.clone()]);
        assert!(!mirror.exists());
    }

    #[test]
    fn round_trip_preserves_value() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("registry.json")).unwrap();
        persist_with_mirrors(&sample(), &path, &[]).unwrap();
        let loaded = load_registry(&path).unwrap();
        assert_eq!(loaded.generated_at, "2026-08-30");
        assert_eq!(loaded.enterprises[0].id, "acme");
    }

    #[test]
    fn serialization_ends_with_single_newline() {
        let s = serialize_registry(&sample()).unwrap();
        assert!(s.ends_with('\n'));
        assert!(!s.ends_with("\n\n"));
        assert!(s.starts_with("{\n  \"generatedAt\""));
    }
}
