use {
    seedstream_config::AddonConfig,
    serde::{Deserialize, Serialize},
};

/// Stremio addon manifest. Only the stream resource is provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonManifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_prefixes: Vec<String>,
}

impl From<&AddonConfig> for AddonManifest {
    fn from(cfg: &AddonConfig) -> Self {
        Self {
            id: cfg.id.clone(),
            version: cfg.version.clone(),
            name: cfg.name.clone(),
            description: cfg.description.clone(),
            resources: vec!["stream".into()],
            types: cfg.types.clone(),
            catalogs: Vec::new(),
            id_prefixes: cfg.id_prefixes.clone(),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_stremio_field_names() {
        let manifest = AddonManifest::from(&AddonConfig::default());
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["id"], "org.seedr.stremio");
        assert_eq!(json["resources"], serde_json::json!(["stream"]));
        assert_eq!(json["catalogs"], serde_json::json!([]));
        assert_eq!(json["idPrefixes"], serde_json::json!(["tt"]));
        assert!(json.get("id_prefixes").is_none());
    }

    #[test]
    fn empty_prefixes_are_omitted() {
        let cfg = AddonConfig {
            id_prefixes: vec![],
            ..Default::default()
        };
        let json = serde_json::to_value(AddonManifest::from(&cfg)).unwrap();
        assert!(json.get("idPrefixes").is_none());
    }
}
