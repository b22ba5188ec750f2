use remo_motif::MotifError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error("bucket size must be positive, got {0}")]
    BadBucketSize(i64),

    #[error("empty position range: min {min} is not below max {max}")]
    EmptyRange { min: i64, max: i64 },
}
