use thiserror::Error;

/// A recoverable, per-chunk failure while parsing sequence text.
///
/// Parse errors are collected on the [`crate::GeneSet`] that produced
/// them; one malformed chunk never aborts the rest of the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("chunk has no header line: {0}")]
    MissingHeader(String),

    #[error("no gene id found in header: {0}")]
    MissingGeneId(String),

    #[error("chunk has more than one header line: {0}")]
    DuplicateHeader(String),

    #[error("bad annotation in line `{line}`: {message}")]
    BadAnnotation { line: String, message: String },

    #[error("{gene_id}: expected ATG/CAT at marker position {position}, got `{codon}`")]
    BadStartCodon {
        gene_id: String,
        position: i64,
        codon: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneSetError {
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    #[error("no genes for stage: {0}")]
    EmptyStage(String),
}
