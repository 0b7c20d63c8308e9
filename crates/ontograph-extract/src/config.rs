//! Extraction settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::extractor::DocumentLanguage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// `ollama` or `scripted`.
    pub provider: String,
    /// Model server address; falls back to `OLLAMA_HOST`, then the local default.
    pub host: Option<String>,
    /// Seconds to wait for one model response.
    pub timeout_secs: u64,
    pub language: DocumentLanguage,
    /// Directory of persisted relation files.
    pub store_dir: PathBuf,
    /// Responses replayed by the `scripted` provider, in order.
    pub scripted_responses: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            host: None,
            timeout_secs: 300,
            language: DocumentLanguage::default(),
            store_dir: PathBuf::from("saved_relations"),
            scripted_responses: Vec::new(),
        }
    }
}
