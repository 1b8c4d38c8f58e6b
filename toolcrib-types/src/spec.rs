use serde::{Deserialize, Serialize};

/// Default build/package commands written into fresh `tool.yaml` files
/// and assumed when a descriptor omits them.
pub mod defaults {
    pub const BUILD_WINDOWS: &str = "flutter build windows";
    pub const BUILD_MACOS: &str = "flutter build macos";
    pub const PACKAGE_WINDOWS: &str = "build/windows/x64/runner/Release";
    pub const PACKAGE_MACOS: &str = "build/macos/Build/Products/Release";
}

/// Per-tool descriptor as stored in `tool.yaml`.
///
/// Reads are tolerant: every field may be absent. Accessors supply the
/// conventional defaults so downstream code never sees `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(default)]
    pub name: Option<String>,

    /// Accepts bare YAML scalars too (`version: 1.0` is a float to the
    /// parser but a version to the author).
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,

    #[serde(default)]
    pub build: PlatformStrings,

    #[serde(default)]
    pub package: PlatformStrings,
}

impl ToolSpec {
    pub fn name_or(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_string())
    }

    pub fn version_or_zero(&self) -> String {
        self.version.clone().unwrap_or_else(|| "0.0.0".to_string())
    }

    pub fn build_windows(&self) -> String {
        self.build
            .windows
            .clone()
            .unwrap_or_else(|| defaults::BUILD_WINDOWS.to_string())
    }

    pub fn build_macos(&self) -> String {
        self.build
            .macos
            .clone()
            .unwrap_or_else(|| defaults::BUILD_MACOS.to_string())
    }

    pub fn package_windows(&self) -> String {
        self.package
            .windows
            .clone()
            .unwrap_or_else(|| defaults::PACKAGE_WINDOWS.to_string())
    }

    pub fn package_macos(&self) -> String {
        self.package
            .macos
            .clone()
            .unwrap_or_else(|| defaults::PACKAGE_MACOS.to_string())
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(i) => i.to_string(),
        // Debug keeps the decimal point (`1.0` stays "1.0", not "1").
        Scalar::Float(f) => format!("{f:?}"),
    }))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformStrings {
    #[serde(default)]
    pub windows: Option<String>,

    #[serde(default)]
    pub macos: Option<String>,
}

/// Fully-resolved identity of a tool being created or updated. Input to
/// registry reconciliation; immutable within one run.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub enterprise_id: String,
    pub enterprise_name: String,
    pub tool_id: String,
    pub tool_name: String,
    pub version: String,
    pub description: String,
}

/// Turn a kebab/snake id into a display name: `paint-shop` -> `Paint Shop`.
pub fn title_from_id(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Sanitize a tool id into a valid Dart package name.
///
/// Lowercases, maps every non `[a-z0-9_]` run to a single underscore,
/// and prefixes `tool_` when the result would start with a digit.
pub fn dart_project_name(tool_id: &str) -> String {
    let lowered = tool_id.to_lowercase().replace('-', "_");
    let mut sanitized = String::with_capacity(lowered.len());
    let mut last_underscore = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            sanitized.push(ch);
            last_underscore = false;
        } else if !last_underscore {
            sanitized.push('_');
            last_underscore = true;
        }
    }
    let sanitized = sanitized.trim_matches('_').to_string();
    if sanitized.is_empty() {
        "tool_app".to_string()
    } else if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("tool_{sanitized}")
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spec_defaults_when_fields_missing() {
        let spec: ToolSpec = serde_yaml::from_str("name: paint\n").unwrap();
        assert_eq!(spec.name_or("x"), "paint");
        assert_eq!(spec.version_or_zero(), "0.0.0");
        assert_eq!(spec.build_windows(), defaults::BUILD_WINDOWS);
        assert_eq!(spec.package_macos(), defaults::PACKAGE_MACOS);
    }

    #[test]
    fn spec_reads_full_descriptor() {
        let yaml = "name: paint\nversion: 1.2.0\nbuild:\n  windows: make win\npackage:\n  macos: out/mac\n";
        let spec: ToolSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.version_or_zero(), "1.2.0");
        assert_eq!(spec.build_windows(), "make win");
        assert_eq!(spec.build_macos(), defaults::BUILD_MACOS);
        assert_eq!(spec.package_macos(), "out/mac");
    }

    #[test]
    fn bare_scalar_version_keeps_decimal_point() {
        let spec: ToolSpec = serde_yaml::from_str("version: 1.0\n").unwrap();
        assert_eq!(spec.version_or_zero(), "1.0");
        let spec: ToolSpec = serde_yaml::from_str("version: 1.25\n").unwrap();
        assert_eq!(spec.version_or_zero(), "1.25");
        let spec: ToolSpec = serde_yaml::from_str("version: 2\n").unwrap();
        assert_eq!(spec.version_or_zero(), "2");
    }

    #[test]
    fn title_from_id_splits_on_dash_and_underscore() {
        assert_eq!(title_from_id("paint-shop"), "Paint Shop");
        assert_eq!(title_from_id("big__data_x"), "Big Data X");
        assert_eq!(title_from_id(""), "");
    }

    #[test]
    fn dart_project_name_sanitizes() {
        assert_eq!(dart_project_name("Paint-Shop"), "paint_shop");
        assert_eq!(dart_project_name("3d-viewer"), "tool_3d_viewer");
        assert_eq!(dart_project_name("--"), "tool_app");
        assert_eq!(dart_project_name("a!!b"), "a_b");
    }
}
