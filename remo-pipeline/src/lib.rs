//! Concurrent motif-analysis pipeline.
//!
//! [`orchestrator::Analyzer`] runs the cross product of motifs and
//! selected stages over a loaded gene set with bounded parallelism;
//! [`cache::GeneSetCache`] keeps parsed gene sets behind a TTL with
//! at-most-one-concurrent-load per path; [`source`] abstracts where the
//! raw sequence text comes from.

pub mod cache;
pub mod errors;
pub mod orchestrator;
pub mod series;
pub mod source;

pub use cache::{DEFAULT_TTL, GeneSetCache, load_for_organism};
pub use errors::PipelineError;
pub use orchestrator::{
    Analyzer, AnalyzerState, CancelHandle, MAX_CONCURRENT_PAIRS, ProgressHandle,
};
pub use series::AnalysisSeries;
pub use source::{FsSource, GeneSetSource, find_sequence_file};
