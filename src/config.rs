//! `ontograph.toml` loading

use std::path::Path;

use anyhow::Context;
use ontograph_core::PipelineConfig;
use ontograph_extract::ExtractionConfig;
use ontograph_server::ServerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub extraction: ExtractionConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Read the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&text).with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
