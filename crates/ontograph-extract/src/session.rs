//! Fresh-or-cached relation retrieval for one document

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ExtractError;
use crate::extractor::{extract_document, DocumentLanguage, RelationExtractor};
use crate::store::{RelationStore, StoredRelations};

/// What to do when the store already holds relations for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReusePolicy {
    #[default]
    Reuse,
    Recompute,
}

/// Relation lines and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "lines", rename_all = "snake_case")]
pub enum RelationSource {
    Fresh(Vec<String>),
    Cached(Vec<String>),
}

impl RelationSource {
    pub fn lines(&self) -> &[String] {
        match self {
            RelationSource::Fresh(lines) | RelationSource::Cached(lines) => lines,
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            RelationSource::Fresh(lines) | RelationSource::Cached(lines) => lines,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, RelationSource::Cached(_))
    }
}

/// Return stored relations for `document`, or extract and store them.
///
/// The model is only called when nothing is stored or `policy` asks for a
/// recompute.
pub async fn obtain_relations(
    extractor: &dyn RelationExtractor,
    store: &dyn RelationStore,
    document: &Document,
    language: DocumentLanguage,
    policy: ReusePolicy,
) -> Result<RelationSource, ExtractError> {
    match (store.get(&document.title)?, policy) {
        (StoredRelations::Found { lines }, ReusePolicy::Reuse) => {
            tracing::info!(title = %document.title, lines = lines.len(), "Using stored relations");
            Ok(RelationSource::Cached(lines))
        }
        (stored, _) => {
            if matches!(stored, StoredRelations::Found { .. }) {
                tracing::info!(title = %document.title, "Recomputing stored relations");
            }
            let content = extract_document(extractor, document, language).await?;
            store.put(&document.title, &content)?;
            let lines = content.lines().map(str::to_string).collect();
            Ok(RelationSource::Fresh(lines))
        }
    }
}
