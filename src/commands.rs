//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ontograph_core::{process_file, process_lines, SegmentView};
use ontograph_extract::{
    create_provider, obtain_relations, Document, DocumentLanguage, FileRelationStore, RelationStore,
    ReusePolicy,
};
use ontograph_server::{OntographServer, ServerState};
use serde::Serialize;

use crate::config::AppConfig;

/// Result of one segment in `graph` output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SegmentOutcome {
    Built(SegmentView),
    Failed { index: usize, error: String },
}

#[derive(Debug, Serialize)]
struct ExtractOutput {
    title: String,
    cached: bool,
    segments: Vec<SegmentView>,
}

pub struct ExtractOptions {
    pub language: Option<DocumentLanguage>,
    pub decompose: bool,
    pub recompute: bool,
    pub pretty: bool,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

pub fn graph(config: &AppConfig, file: PathBuf, pretty: bool) -> anyhow::Result<()> {
    tracing::info!("Building graphs from {}", file.display());

    let results = process_file(&file, &config.pipeline)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut failed = 0usize;
    let outcomes: Vec<SegmentOutcome> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(report) => SegmentOutcome::Built(report.view()),
            Err(e) => {
                tracing::error!("Segment {} failed: {}", index, e);
                failed += 1;
                SegmentOutcome::Failed {
                    index,
                    error: e.to_string(),
                }
            }
        })
        .collect();

    tracing::info!("Built {} segments, {} failed", outcomes.len() - failed, failed);
    print_json(&outcomes, pretty)
}

pub async fn extract(config: &AppConfig, path: PathBuf, options: ExtractOptions) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Document path has no file name")?;

    let document = if options.decompose {
        Document::decomposed(title.clone(), &text)
    } else {
        Document::whole(title.clone(), text)
    };
    let language = options.language.unwrap_or(config.extraction.language);
    let policy = if options.recompute {
        ReusePolicy::Recompute
    } else {
        ReusePolicy::Reuse
    };

    let extractor = create_provider(&config.extraction)?;
    let store = FileRelationStore::new(&config.extraction.store_dir);
    let source = obtain_relations(extractor.as_ref(), &store, &document, language, policy).await?;

    let cached = source.is_cached();
    let reports = process_lines(source.lines(), &config.pipeline);
    let output = ExtractOutput {
        title,
        cached,
        segments: reports.iter().map(|r| r.view()).collect(),
    };
    print_json(&output, options.pretty)
}

pub async fn serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut server_config = config.server;
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }
    tracing::info!(
        "Starting Ontograph server on {}:{}",
        server_config.host,
        server_config.port
    );

    let extractor = create_provider(&config.extraction)?;
    tracing::info!("Using {} provider", extractor.name());
    let store = FileRelationStore::new(&config.extraction.store_dir);

    let state = ServerState::new(
        config.pipeline,
        config.extraction,
        Arc::new(store),
        Arc::from(extractor),
    );
    OntographServer::new(state, server_config).start().await
}

pub fn clear(config: &AppConfig) -> anyhow::Result<()> {
    let store = FileRelationStore::new(&config.extraction.store_dir);
    tracing::info!("Clearing saved relations in {}", store.dir().display());

    store.clear()?;

    tracing::info!("Saved relations cleared");
    Ok(())
}
