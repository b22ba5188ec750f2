//! Core types for remo: gene sequence analysis over developmental stages.
//!
//! This crate holds the data model shared by the rest of the workspace:
//!
//! - [`models::Gene`] and [`models::GeneSet`]: parsed sequence records with
//!   embedded expression and marker annotations
//! - [`models::StageSelection`]: how to narrow a gene set for one stage
//!   (percentile or fixed-count ranking, top or bottom)
//! - [`models::Organism`] and [`OrganismRegistry`]: presentation metadata
//!   (canonical stage order, colors, transcript policy)
//!
//! Collections are immutable once built; filtering and deduplication
//! produce new `GeneSet` values so concurrent readers never observe a
//! mutation.

pub mod errors;
pub mod models;
pub mod registry;
pub mod selector;
pub mod utils;

// re-exports for cleaner imports
pub use errors::{GeneSetError, ParseError};
pub use models::{Gene, GeneSet, Organism, RankMode, RankStrategy, StageSelection, StageStyle};
pub use registry::OrganismRegistry;
pub use selector::{ALL_STAGES, select_stage, stage_label};
