use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogError, EntityTypeDescriptor, TemplateId, TypeCatalog};

pub const DEFAULT_HOST_PORT: u16 = 8001;
pub const DEFAULT_LOCAL_PORT: u16 = 8002;
pub const UNKNOWN_ENTITY_TEMPLATE: &str = "DisUnknownEntity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub host_address: String,
    pub host_port: u16,
    pub local_address: String,
    pub local_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host_address: "localhost".to_string(),
            host_port: DEFAULT_HOST_PORT,
            local_address: "localhost".to_string(),
            local_port: DEFAULT_LOCAL_PORT,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builds a catalog from configured entries, adding the unknown-entity
/// fallback when no entry covers the all-zero type.
pub fn build_catalog(mut entries: Vec<CatalogEntry>) -> Result<TypeCatalog, CatalogError> {
    if !entries.iter().any(|entry| entry.descriptor.is_unknown()) {
        entries.push(CatalogEntry::new(
            EntityTypeDescriptor::UNKNOWN,
            TemplateId::from(UNKNOWN_ENTITY_TEMPLATE),
        ));
    }
    TypeCatalog::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_keys() {
        let config = ClientConfig::from_json(
            r#"{"hostAddress": "10.0.0.5", "hostPort": 3000, "localPort": 3001}"#,
        )
        .unwrap();

        assert_eq!(config.host_address, "10.0.0.5");
        assert_eq!(config.host_port, 3000);
        assert_eq!(config.local_address, "localhost");
        assert_eq!(config.local_port, 3001);
    }

    #[test]
    fn empty_object_uses_defaults() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn catalog_gains_unknown_fallback() {
        let catalog = build_catalog(vec![CatalogEntry::new(
            EntityTypeDescriptor::new(1, 0, 0, 0, 0, 0, 0),
            "Frigate",
        )])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.fallback().as_str(), UNKNOWN_ENTITY_TEMPLATE);
    }

    #[test]
    fn configured_fallback_is_kept() {
        let catalog = build_catalog(vec![CatalogEntry::new(
            EntityTypeDescriptor::UNKNOWN,
            "PlaceholderBox",
        )])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.fallback().as_str(), "PlaceholderBox");
    }
}
