//! Integration tests for Ontograph
//!
//! These tests verify that multiple systems work together correctly.

use std::process::Command;

use ontograph_core::{process_lines, PipelineConfig};
use ontograph_extract::providers::scripted::ScriptedProvider;
use ontograph_extract::{
    extract_document, obtain_relations, Document, DocumentLanguage, FileRelationStore, ReusePolicy,
};
use tempfile::TempDir;

fn ontograph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ontograph"))
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = ontograph().arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ontograph"));
    assert!(stdout.contains("graph"));
    assert!(stdout.contains("extract"));
}

/// Test that a saved relations file becomes one JSON entry per segment
#[test]
fn test_graph_command_reports_every_segment() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("doc.txt");
    let mut content = b"paris, france -> capital_of -> france\nparis -> hosts -> louvre\n---\n".to_vec();
    content.extend_from_slice(b"\xfe\xff -> r -> x\n---\nsun -> warms -> earth\n");
    std::fs::write(&file, content).unwrap();

    let output = ontograph()
        .current_dir(dir.path())
        .arg("graph")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let segments = json.as_array().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0]["title"], "Part 1/3");
    assert_eq!(segments[0]["canonical_nodes"], serde_json::json!(["paris"]));
    assert!(segments[1]["error"].as_str().unwrap().contains("not text"));
    assert_eq!(segments[2]["nodes"], serde_json::json!(["sun", "earth"]));
}

/// Test that the extract command reuses saved relations
#[test]
fn test_extract_command_uses_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ontograph.toml"),
        "[extraction]\nprovider = \"scripted\"\nscripted_responses = [\"a -> likes -> b\"]\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("story.md"), "A likes B.").unwrap();

    let run = || {
        ontograph()
            .current_dir(dir.path())
            .args(["extract", "story.md"])
            .output()
            .unwrap()
    };

    let first = run();
    assert!(first.status.success());
    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["cached"], false);
    assert_eq!(json["segments"][0]["edges"][0]["label"], "likes");
    assert!(dir.path().join("saved_relations/story.txt").is_file());

    let second = run();
    assert!(second.status.success());
    let json: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(json["cached"], true);

    let cleared = ontograph().current_dir(dir.path()).arg("clear").output().unwrap();
    assert!(cleared.status.success());
    assert!(!dir.path().join("saved_relations/story.txt").exists());
}

/// Test that extraction output flows through the pipeline unchanged
#[test]
fn test_decomposed_document_yields_one_graph_per_part() {
    tokio_test::block_on(async {
        let provider = ScriptedProvider::new([
            "cat -> chases -> mouse",
            "dog -> chases -> cat",
        ]);
        let text = "# Cats and mice\nThe cat chases the mouse.\n# Dogs and cats\nThe dog chases the cat.\n";
        let document = Document::decomposed("pets.md", text);
        assert_eq!(document.parts.len(), 3);

        // The leading part is empty but still costs a request.
        let result = extract_document(&provider, &document, DocumentLanguage::English).await;
        assert!(result.is_err());

        let provider = ScriptedProvider::new(["", "cat -> chases -> mouse", "dog -> chases -> cat"]);
        let content = extract_document(&provider, &document, DocumentLanguage::English)
            .await
            .unwrap();
        let reports = process_lines(content.lines(), &PipelineConfig::default());
        assert_eq!(reports.len(), 3);
        assert!(reports[0].graph.is_empty());
        assert_eq!(reports[1].graph.nodes(), vec!["cat", "mouse"]);
        assert_eq!(reports[2].graph.nodes(), vec!["dog", "cat"]);
        assert_eq!(reports[2].title.as_deref(), Some("Part 3/3"));
    });
}

/// Test that the session writes the persisted relations format
#[test]
fn test_session_file_round_trip() {
    tokio_test::block_on(async {
        let dir = TempDir::new().unwrap();
        let store = FileRelationStore::new(dir.path());
        let provider = ScriptedProvider::new(["x -> near -> y", "z -> near -> w"]);
        let document = Document {
            title: "two.md".to_string(),
            parts: vec!["first".to_string(), "second".to_string()],
        };

        obtain_relations(&provider, &store, &document, DocumentLanguage::English, ReusePolicy::Reuse)
            .await
            .unwrap();
        let saved = std::fs::read(dir.path().join("two.txt")).unwrap();
        let results = ontograph_core::process_bytes(&saved, &PipelineConfig::default());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    });
}
