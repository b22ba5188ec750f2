//! Export views of analysis results.
//!
//! The pipeline's results stay as rich in-memory structures; this crate
//! flattens them into the logical tables and serializable records that
//! external exporters and calling layers consume. File-format rendering
//! (spreadsheet, CSV) is out of scope here.

pub mod tables;
pub mod views;

pub use tables::{BucketRow, GeneRow, GeneTable, bucket_table};
pub use views::{BucketView, DistributionView, SeriesView};
