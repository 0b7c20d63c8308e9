//! Pipeline error types

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort one segment of a relations stream.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Both positions are zero-based; `line` counts within the segment.
    #[error("Segment {segment} is not text (line {line} is not valid UTF-8)")]
    NonText { segment: usize, line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
