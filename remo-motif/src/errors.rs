use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotifError {
    #[error("definition list cannot be empty")]
    EmptyDefinition,

    #[error("motif definition `{0}` contains invalid characters")]
    InvalidMotif(String),

    #[error("unsupported code `{0}`")]
    UnsupportedCode(char),
}
