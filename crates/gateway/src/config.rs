use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use disgate::{CatalogEntry, ClientConfig};

pub const DEFAULT_TICK_RATE: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub client: ClientConfig,
    pub tick_rate: u32,
    pub templates: Vec<CatalogEntry>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            tick_rate: DEFAULT_TICK_RATE,
            templates: Vec::new(),
        }
    }
}

impl GatewayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }
}
