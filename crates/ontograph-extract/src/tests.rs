//! Unit tests for ontograph-extract

use crate::providers::scripted::ScriptedProvider;
use crate::*;

#[test]
fn test_provider_creation() {
    let ollama = create_provider(&ExtractionConfig::default());
    assert!(ollama.is_ok());
    assert_eq!(ollama.unwrap().name(), "Ollama");

    let scripted = create_provider(&ExtractionConfig {
        provider: "scripted".to_string(),
        ..ExtractionConfig::default()
    });
    assert!(scripted.is_ok());

    let unknown = create_provider(&ExtractionConfig {
        provider: "unknown".to_string(),
        ..ExtractionConfig::default()
    });
    assert!(unknown.is_err());
}

#[test]
fn test_single_part_extraction() {
    tokio_test::block_on(async {
        let provider = ScriptedProvider::new(["Sure!\nsun -> warms -> earth\nmoon -> orbits -> earth"]);
        let document = Document::whole("sky.md", "The sun warms the earth.");

        let content = extract_document(&provider, &document, DocumentLanguage::French)
            .await
            .unwrap();
        assert_eq!(content, "sun -> warms -> earth\nmoon -> orbits -> earth");

        let prompts = provider.prompts().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "relations_extraction_fr");
        assert!(prompts[0].1.contains("The sun warms the earth."));
    });
}

#[test]
fn test_parts_are_separated_by_delimiter() {
    tokio_test::block_on(async {
        let provider = ScriptedProvider::new(["", "a -> r -> b", "c -> r -> d\nnoise"]);
        let document = Document::decomposed(
            "book.md",
            "# Chapter one text\nEverything in chapter one\n# Chapter two text\nEverything in chapter two\n",
        );
        assert_eq!(document.parts.len(), 3);

        let content = extract_document(&provider, &document, DocumentLanguage::English)
            .await
            .unwrap();
        assert_eq!(content, "---\na -> r -> b\n---\nc -> r -> d");
    });
}

#[test]
fn test_failed_request_names_the_part() {
    tokio_test::block_on(async {
        let provider = ScriptedProvider::new(["a -> r -> b"]);
        let document = Document {
            title: "two.md".to_string(),
            parts: vec!["first".to_string(), "second".to_string()],
        };
        let err = extract_document(&provider, &document, DocumentLanguage::English)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Completion { part: 2, total: 2, .. }));
    });
}

#[test]
fn test_session_reuses_stored_relations() {
    tokio_test::block_on(async {
        let provider = ScriptedProvider::new(["a -> r -> b", "c -> r -> d"]);
        let store = MemoryRelationStore::new();
        let document = Document::whole("doc.md", "text");

        let first = obtain_relations(&provider, &store, &document, DocumentLanguage::English, ReusePolicy::Reuse)
            .await
            .unwrap();
        assert_eq!(first, RelationSource::Fresh(vec!["a -> r -> b".to_string()]));

        let second = obtain_relations(&provider, &store, &document, DocumentLanguage::English, ReusePolicy::Reuse)
            .await
            .unwrap();
        assert!(second.is_cached());
        assert_eq!(second.lines(), first.lines());
        assert_eq!(provider.prompts().await.len(), 1);

        let third = obtain_relations(&provider, &store, &document, DocumentLanguage::English, ReusePolicy::Recompute)
            .await
            .unwrap();
        assert_eq!(third, RelationSource::Fresh(vec!["c -> r -> d".to_string()]));
        assert_eq!(provider.prompts().await.len(), 2);
    });
}

#[test]
fn test_session_persists_to_file_store() {
    tokio_test::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRelationStore::new(dir.path());
        let provider = ScriptedProvider::new(["x -> y -> z"]);
        let document = Document::whole("paper.pdf.md", "text");

        obtain_relations(&provider, &store, &document, DocumentLanguage::English, ReusePolicy::Reuse)
            .await
            .unwrap();
        let saved = std::fs::read_to_string(dir.path().join("paper.txt")).unwrap();
        assert_eq!(saved, "x -> y -> z");
    });
}

#[test]
fn test_relation_source_serialises_with_tag() {
    let source = RelationSource::Cached(vec!["a -> r -> b".to_string()]);
    insta::assert_json_snapshot!(source, @r#"
    {
      "source": "cached",
      "lines": [
        "a -> r -> b"
      ]
    }
    "#);
}

#[test]
fn test_extraction_config_defaults() {
    let config: ExtractionConfig = serde_json::from_str(r#"{"language": "fr"}"#).unwrap();
    assert_eq!(config.language, DocumentLanguage::French);
    assert_eq!(config.provider, "ollama");
    assert_eq!(config.store_dir, std::path::PathBuf::from("saved_relations"));
}
