//! Language-model provider implementations

pub mod ollama;
pub mod scripted;

use anyhow::Result;

use crate::config::ExtractionConfig;
use crate::extractor::RelationExtractor;

/// Factory function to create relation extractors
pub fn create_provider(config: &ExtractionConfig) -> Result<Box<dyn RelationExtractor>> {
    match config.provider.as_str() {
        "ollama" => Ok(Box::new(
            ollama::OllamaProvider::new(config.host.clone()).with_timeout(config.timeout_secs)?,
        )),
        "scripted" => Ok(Box::new(scripted::ScriptedProvider::new(
            config.scripted_responses.clone(),
        ))),
        _ => anyhow::bail!("Unknown extraction provider: {}", config.provider),
    }
}
