use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use toolcrib_types::spec::ToolSpec;
use tracing::debug;

/// Command prefixed to build commands so every CI build re-applies the
/// font patch before compiling. Idempotence of the patch makes this
/// safe to run unconditionally.
const APPLY_FONT_CMD: &str = "toolcrib apply-font --tool .";
const APPLY_FONT_MARKER: &str = "apply-font";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Matrix {
    pub include: Vec<MatrixEntry>,
}

impl Matrix {
    pub fn has_tools(&self) -> bool {
        !self.include.is_empty()
    }
}

/// One row of the CI build matrix: a (tool, platform) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub os: String,
    pub platform: String,
    pub build_cmd: String,
    pub package_dir: String,
    pub enterprise: String,
    pub tool: String,
    pub name: String,
    pub version: String,
    pub dir: String,
}

/// Expand each descriptor into windows + macos matrix rows.
///
/// Descriptor paths that do not follow the tenant convention are
/// skipped, not errors.
pub fn build_matrix(repo_root: &Utf8Path, specs: &[Utf8PathBuf]) -> anyhow::Result<Matrix> {
    let mut matrix = Matrix::default();
    for spec_path in specs {
        let rel = spec_path.strip_prefix(repo_root).unwrap_or(spec_path);
        let Some((enterprise, tool)) = crate::tool_from_path(rel.as_str()) else {
            debug!(%spec_path, "descriptor outside tenant convention; skipping");
            continue;
        };

        let contents =
            fs::read_to_string(spec_path).with_context(|| format!("read {spec_path}"))?;
        let spec: ToolSpec =
            serde_yaml::from_str(&contents).with_context(|| format!("parse {spec_path}"))?;

        let dir = rel
            .parent()
            .map(|p| p.as_str().replace('\\', "/"))
            .unwrap_or_default();
        let name = spec.name_or(&tool);
        let version = spec.version_or_zero();

        matrix.include.push(MatrixEntry {
            os: "windows-latest".to_string(),
            platform: "windows".to_string(),
            build_cmd: with_font_step(spec.build_windows()),
            package_dir: spec.package_windows(),
            enterprise: enterprise.clone(),
            tool: tool.clone(),
            name: name.clone(),
            version: version.clone(),
            dir: dir.clone(),
        });
        matrix.include.push(MatrixEntry {
            os: "macos-latest".to_string(),
            platform: "macos".to_string(),
            build_cmd: with_font_step(spec.build_macos()),
            package_dir: spec.package_macos(),
            enterprise,
            tool,
            name,
            version,
            dir,
        });
    }
    Ok(matrix)
}

fn with_font_step(build_cmd: String) -> String {
    if build_cmd.contains(APPLY_FONT_MARKER) {
        build_cmd
    } else {
        format!("{APPLY_FONT_CMD} && {build_cmd}")
    }
}

/// Append `matrix=` and `has_tools=` lines in GitHub Actions output
/// format.
pub fn write_github_output(path: &Utf8Path, matrix: &Matrix) -> anyhow::Result<()> {
    let json = serde_json::to_string(matrix).context("serialize matrix")?;
    let mut contents = String::new();
    if path.exists() {
        contents = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    }
    contents.push_str(&format!("matrix={json}\n"));
    contents.push_str(&format!(
        "has_tools={}\n",
        if matrix.has_tools() { "true" } else { "false" }
    ));
    fs::write(path, contents).with_context(|| format!("write {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> (tempfile::TempDir, Utf8PathBuf, Utf8PathBuf) {
        let td = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let dir = root.join("tenants/acme/tools/paint");
        fs::create_dir_all(&dir).unwrap();
        let spec = dir.join("tool.yaml");
        fs::write(
            &spec,
            "name: Paint\nversion: 1.2.0\nbuild:\n  windows: custom build win\n",
        )
        .unwrap();
        (td, root, spec)
    }

    #[test]
    fn two_rows_per_tool_with_defaults() {
        let (_td, root, spec) = fixture();
        let matrix = build_matrix(&root, &[spec]).unwrap();
        assert_eq!(matrix.include.len(), 2);

        let win = &matrix.include[0];
        assert_eq!(win.os, "windows-latest");
        assert_eq!(win.build_cmd, "toolcrib apply-font --tool . && custom build win");
        assert_eq!(win.package_dir, "build/windows/x64/runner/Release");
        assert_eq!(win.dir, "tenants/acme/tools/paint");
        assert_eq!(win.version, "1.2.0");

        let mac = &matrix.include[1];
        assert_eq!(mac.platform, "macos");
        assert_eq!(mac.build_cmd, "toolcrib apply-font --tool . && flutter build macos");
        assert_eq!(mac.name, "Paint");
    }

    #[test]
    fn font_step_is_not_duplicated() {
        assert_eq!(
            with_font_step("toolcrib apply-font --tool . && flutter build windows".to_string()),
            "toolcrib apply-font --tool . && flutter build windows"
        );
    }

    #[test]
    fn github_output_appends_both_keys() {
        let td = tempfile::tempdir().unwrap();
        let out = Utf8PathBuf::from_path_buf(td.path().join("output")).unwrap();
        fs::write(&out, "existing=1\n").unwrap();

        write_github_output(&out, &Matrix::default()).unwrap();
        let contents = fs::read_to_string(&out).unwrap();
        assert!(contents.starts_with("existing=1\n"));
        assert!(contents.contains("matrix={\"include\":[]}\n"));
        assert!(contents.ends_with("has_tools=false\n"));
    }
}
