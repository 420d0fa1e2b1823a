use thiserror::Error;

/// Failures that abort a run. Everything else (missing cells, missing
/// descriptor columns, odd quarter tokens, empty views) is absorbed where it
/// happens and never reaches this type.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
