use serde::{Deserialize, Serialize};

/// The persisted catalog of enterprises and their tools.
///
/// Serialized field order is the on-disk contract: `generatedAt`,
/// `source`, `enterprises`. Mirrors hold byte-identical copies of the
/// same serialization, so nothing here may reorder fields at write
/// time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// ISO date of the last reconciliation.
    #[serde(rename = "generatedAt", default)]
    pub generated_at: String,

    /// Tag identifying what wrote the registry.
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub enterprises: Vec<Enterprise>,
}

impl Registry {
    pub fn enterprise(&self, id: &str) -> Option<&Enterprise> {
        self.enterprises.iter().find(|e| e.id == id)
    }

    pub fn enterprise_mut(&mut self, id: &str) -> Option<&mut Enterprise> {
        self.enterprises.iter_mut().find(|e| e.id == id)
    }
}

/// One tenant group. `id` is the immutable key; `name` is display
/// metadata and may be rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub tools: Vec<ToolEntry>,
}

impl Enterprise {
    pub fn tool(&self, id: &str) -> Option<&ToolEntry> {
        self.tools.iter().find(|t| t.id == id)
    }
}

/// One tool within an enterprise. Ids are unique within the enterprise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub platforms: Platforms,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    pub macos: PlatformArtifact,

    #[serde(default)]
    pub windows: PlatformArtifact,
}

/// Release artifact coordinates for one platform. Both fields are empty
/// strings when no repository identity could be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformArtifact {
    #[serde(default)]
    pub asset: String,

    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_field_order_is_stable() {
        let reg = Registry {
            generated_at: "2026-08-30".to_string(),
            source: "toolcrib".to_string(),
            enterprises: vec![Enterprise {
                id: "acme".to_string(),
                name: "Acme".to_string(),
                tools: vec![],
            }],
        };
        let json = serde_json::to_string(&reg).unwrap();
        assert_eq!(
            json,
            r#"{"generatedAt":"2026-08-30","source":"toolcrib","enterprises":[{"id":"acme","name":"Acme","tools":[]}]}"#
        );
    }

    #[test]
    fn tolerant_read_fills_defaults() {
        let reg: Registry = serde_json::from_str(r#"{"enterprises":[{"id":"acme"}]}"#).unwrap();
        assert_eq!(reg.generated_at, "");
        assert_eq!(reg.enterprises.len(), 1);
        assert_eq!(reg.enterprises[0].name, "");
        assert!(reg.enterprises[0].tools.is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let reg: Registry = serde_json::from_str(
            r#"{"enterprises":[{"id":"acme","tools":[{"id":"paint"}]}]}"#,
        )
        .unwrap();
        assert!(reg.enterprise("acme").is_some());
        assert!(reg.enterprise("none").is_none());
        assert!(reg.enterprise("acme").unwrap().tool("paint").is_some());
    }
}
