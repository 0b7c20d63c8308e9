//! HTTP server exposing the relation pipeline

pub mod handlers;
pub mod router;

use std::sync::Arc;

use anyhow::Context;
use ontograph_core::PipelineConfig;
use ontograph_extract::{ExtractionConfig, RelationExtractor, RelationStore};
use serde::{Deserialize, Serialize};

/// Address the server binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

/// Shared state handed to every request handler.
pub struct ServerState {
    pub pipeline: PipelineConfig,
    pub extraction: ExtractionConfig,
    pub store: Arc<dyn RelationStore>,
    pub extractor: Arc<dyn RelationExtractor>,
}

impl ServerState {
    pub fn new(
        pipeline: PipelineConfig,
        extraction: ExtractionConfig,
        store: Arc<dyn RelationStore>,
        extractor: Arc<dyn RelationExtractor>,
    ) -> Self {
        Self {
            pipeline,
            extraction,
            store,
            extractor,
        }
    }
}

pub struct OntographServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl OntographServer {
    pub fn new(state: ServerState, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        let app = router::create_router(self.state);
        axum::serve(listener, app).await.context("Server error")?;
        Ok(())
    }
}
