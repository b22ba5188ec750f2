use remo_core::GeneSetError;
use remo_scan::ScanError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("analysis precondition not met: {0}")]
    Precondition(String),

    #[error(transparent)]
    Stage(#[from] GeneSetError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to load `{path}`: {message}")]
    CacheLoad { path: String, message: String },

    #[error("analysis task failed: {0}")]
    Task(String),
}
