//! Language-model bridge for relation extraction

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ExtractError;
use crate::prompt::extraction_prompt;

/// Line written between the relations of two document parts.
pub const PART_DELIMITER: &str = "---";

/// A backend that answers a prompt with plain text.
#[async_trait::async_trait]
pub trait RelationExtractor: Send + Sync {
    /// Send one prompt to `model` and return the full response text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Language of the source document; selects the extraction model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLanguage {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "fr", alias = "français")]
    French,
}

impl DocumentLanguage {
    pub fn model(self) -> &'static str {
        match self {
            DocumentLanguage::English => "relations_extraction",
            DocumentLanguage::French => "relations_extraction_fr",
        }
    }
}

impl fmt::Display for DocumentLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentLanguage::English => write!(f, "english"),
            DocumentLanguage::French => write!(f, "french"),
        }
    }
}

impl FromStr for DocumentLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(DocumentLanguage::English),
            "fr" | "french" | "français" | "francais" => Ok(DocumentLanguage::French),
            other => Err(format!("Unknown document language: {other}")),
        }
    }
}

/// Keep the response lines that look like relations.
///
/// A line is kept when splitting it on `->` gives exactly three fields and
/// the middle one is not blank.
pub fn filter_relation_lines(response: &str) -> Vec<String> {
    response
        .trim()
        .lines()
        .filter(|line| {
            let fields: Vec<&str> = line.split("->").collect();
            fields.len() == 3 && !fields[1].trim().is_empty()
        })
        .map(str::to_string)
        .collect()
}

/// Extract the relations of every part of `document`, one request per part.
///
/// The result is in the persisted relations format: one relation per line,
/// with a `---` line between the relations of consecutive parts.
pub async fn extract_document(
    extractor: &dyn RelationExtractor,
    document: &Document,
    language: DocumentLanguage,
) -> std::result::Result<String, ExtractError> {
    if document.parts.is_empty() {
        return Err(ExtractError::EmptyDocument(document.title.clone()));
    }

    let model = language.model();
    let total = document.parts.len();
    tracing::info!(
        title = %document.title,
        parts = total,
        %language,
        provider = extractor.name(),
        "Extracting relations"
    );

    let mut output: Vec<String> = Vec::new();
    for (index, text) in document.parts.iter().enumerate() {
        if document.is_multipart() {
            tracing::info!(
                "Processing part {}/{}: {:?}",
                index + 1,
                total,
                document.part_heading(index)
            );
        }

        let response = extractor
            .complete(model, &extraction_prompt(text))
            .await
            .map_err(|err| ExtractError::Completion {
                part: index + 1,
                total,
                message: format!("{err:#}"),
            })?;

        let relations = filter_relation_lines(&response);
        tracing::debug!(part = index + 1, kept = relations.len(), "Filtered model response");

        if index > 0 {
            output.push(PART_DELIMITER.to_string());
        }
        output.extend(relations);
    }

    Ok(output.join("\n"))
}
