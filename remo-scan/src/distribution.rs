use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use remo_core::models::GeneSet;

use crate::engine::MotifMatch;
use crate::errors::ScanError;

///
/// Binning configuration for a positional distribution.
///
/// Positions are taken relative to `align_marker` when it is set and
/// present on a match's gene; matches whose aligned position falls
/// outside `[min, max]` are not binned.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub min: i64,
    pub max: i64,
    pub bucket_size: i64,
    #[serde(default)]
    pub align_marker: Option<String>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            min: -1000,
            max: 1000,
            bucket_size: 30,
            align_marker: None,
        }
    }
}

impl DistributionConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.bucket_size <= 0 {
            return Err(ScanError::BadBucketSize(self.bucket_size));
        }
        if self.min >= self.max {
            return Err(ScanError::EmptyRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Number of rendered buckets. A non-exact remainder range at the
    /// top is dropped.
    pub fn bucket_count(&self) -> usize {
        ((self.max - self.min) / self.bucket_size) as usize
    }
}

/// One rendered bucket of a [`Distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub min: i64,
    pub max: i64,
    pub count: usize,
    pub percent: f64,
    pub gene_ids: BTreeSet<String>,
    pub gene_percent: f64,
}

impl DataPoint {
    pub fn gene_count(&self) -> usize {
        self.gene_ids.len()
    }

    /// Interval label, e.g. `<0; 30)`.
    pub fn label(&self) -> String {
        format!("<{}; {})", self.min, self.max)
    }
}

///
/// A bucketed histogram of match positions for one analysis pair.
///
/// `total_matches` is the count before range filtering, so per-bucket
/// `percent` values do not sum to 1.0 when matches fall outside
/// `[min, max]`. Downstream consumers rely on these exact numbers.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub config: DistributionConfig,
    counts: HashMap<i64, usize>,
    bucket_genes: HashMap<i64, BTreeSet<String>>,
    pub total_matches: usize,
    pub total_genes: usize,
    pub total_genes_with_match: usize,
}

impl Distribution {
    ///
    /// Bin matches against the gene set they were found in.
    ///
    /// The gene set supplies the alignment-marker offsets and the
    /// total-genes denominator for per-bucket gene percentages.
    ///
    pub fn build(
        matches: &[MotifMatch],
        gene_set: &GeneSet,
        config: DistributionConfig,
    ) -> Result<Self, ScanError> {
        config.validate()?;

        let offsets: HashMap<&str, i64> = match &config.align_marker {
            Some(marker) => gene_set
                .genes
                .iter()
                .filter_map(|g| g.markers.get(marker).map(|&o| (g.gene_id.as_str(), o)))
                .collect(),
            None => HashMap::new(),
        };

        let mut counts: HashMap<i64, usize> = HashMap::new();
        let mut bucket_genes: HashMap<i64, BTreeSet<String>> = HashMap::new();

        for m in matches {
            let offset = offsets.get(m.gene_id.as_str()).copied().unwrap_or(0);
            let aligned = m.position as i64 - offset;
            if aligned < config.min || aligned > config.max {
                continue;
            }
            let index = (aligned - config.min) / config.bucket_size;
            *counts.entry(index).or_insert(0) += 1;
            bucket_genes
                .entry(index)
                .or_default()
                .insert(m.gene_id.clone());
        }

        let with_match: BTreeSet<&str> = matches.iter().map(|m| m.gene_id.as_str()).collect();

        Ok(Distribution {
            config,
            counts,
            bucket_genes,
            total_matches: matches.len(),
            total_genes: gene_set.len(),
            total_genes_with_match: with_match.len(),
        })
    }

    pub fn data_points(&self) -> Vec<DataPoint> {
        (0..self.config.bucket_count() as i64)
            .map(|i| {
                let count = self.counts.get(&i).copied().unwrap_or(0);
                let gene_ids = self.bucket_genes.get(&i).cloned().unwrap_or_default();
                let gene_count = gene_ids.len();
                DataPoint {
                    min: self.config.min + i * self.config.bucket_size,
                    max: self.config.min + (i + 1) * self.config.bucket_size,
                    count,
                    percent: if self.total_matches > 0 {
                        count as f64 / self.total_matches as f64
                    } else {
                        0.0
                    },
                    gene_ids,
                    gene_percent: if self.total_genes > 0 {
                        gene_count as f64 / self.total_genes as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }
}
