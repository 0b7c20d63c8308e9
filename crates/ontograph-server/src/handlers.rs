//! REST API handlers for the Ontograph server

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use ontograph_core::{process_lines, PipelineConfig, SegmentReport, SegmentView};
use ontograph_extract::{
    obtain_relations, Document, DocumentLanguage, ExtractError, ReusePolicy, StoreError,
};
use serde::{Deserialize, Serialize};

use crate::ServerState;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Language model error: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        tracing::warn!(%status, "{}", message);
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Completion { .. } => ApiError::BadGateway(err.to_string()),
            ExtractError::EmptyDocument(_) | ExtractError::Store(StoreError::InvalidTitle(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            ExtractError::Store(StoreError::Io(_)) => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Relations to turn into graphs, as separate lines or one text blob.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphRequest {
    pub lines: Option<Vec<String>>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    pub segments: Vec<SegmentView>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub title: String,
    pub text: String,
    pub language: Option<DocumentLanguage>,
    #[serde(default)]
    pub decompose: bool,
    #[serde(default)]
    pub recompute: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub title: String,
    /// True when the relations came from the store instead of the model.
    pub cached: bool,
    pub lines: Vec<String>,
    pub segments: Vec<SegmentView>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}

/// Build one graph per segment of the posted relations.
pub async fn build_graph(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<GraphRequest>,
) -> Result<Json<GraphResponse>, ApiError> {
    let lines = match (request.lines, request.text) {
        (Some(lines), _) => lines,
        (None, Some(text)) => text.lines().map(str::to_string).collect(),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Expected either \"lines\" or \"text\"".to_string(),
            ))
        }
    };
    let segments = run_pipeline(state.pipeline.clone(), lines).await?;
    Ok(Json(GraphResponse { segments }))
}

/// Extract (or reuse) the relations of a document and build its graphs.
pub async fn extract(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Document title is empty".to_string()));
    }

    let document = if request.decompose {
        Document::decomposed(request.title.clone(), &request.text)
    } else {
        Document::whole(request.title.clone(), request.text)
    };
    let language = request.language.unwrap_or(state.extraction.language);
    let policy = if request.recompute {
        ReusePolicy::Recompute
    } else {
        ReusePolicy::Reuse
    };

    let source = obtain_relations(
        state.extractor.as_ref(),
        state.store.as_ref(),
        &document,
        language,
        policy,
    )
    .await?;
    let cached = source.is_cached();
    let lines = source.into_lines();
    let segments = run_pipeline(state.pipeline.clone(), lines.clone()).await?;

    Ok(Json(ExtractResponse {
        title: request.title,
        cached,
        lines,
        segments,
    }))
}

/// Layout is CPU-bound, so the pipeline runs off the async workers.
async fn run_pipeline(config: PipelineConfig, lines: Vec<String>) -> Result<Vec<SegmentView>, ApiError> {
    tokio::task::spawn_blocking(move || {
        process_lines(&lines, &config)
            .iter()
            .map(SegmentReport::view)
            .collect()
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Pipeline task failed: {e}")))
}
