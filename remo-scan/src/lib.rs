//! Motif scanning and positional distributions.
//!
//! [`engine`] finds motif occurrences across a gene set (forward and
//! reverse-complement definitions, optional greedy overlap resolution)
//! and [`distribution`] bins the resulting positions into a bucketed
//! histogram aligned to a per-gene marker.

pub mod distribution;
pub mod engine;
pub mod errors;

pub use distribution::{DataPoint, Distribution, DistributionConfig};
pub use engine::{MotifMatch, find_matches, scan_gene_set, suppress_overlapping};
pub use errors::ScanError;
