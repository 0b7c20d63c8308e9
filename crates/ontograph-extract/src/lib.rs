//! Relation extraction for Ontograph
//!
//! This crate turns documents into raw `subject -> predicate -> object`
//! lines with a language model, and keeps the results in a relation store
//! so a document is only sent to the model once.

pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::ExtractionConfig;
pub use document::Document;
pub use error::{ExtractError, StoreError};
pub use extractor::{extract_document, filter_relation_lines, DocumentLanguage, RelationExtractor};
pub use providers::create_provider;
pub use session::{obtain_relations, RelationSource, ReusePolicy};
pub use store::{FileRelationStore, MemoryRelationStore, RelationStore, StoredRelations};
