use serde::Serialize;

use remo_pipeline::AnalysisSeries;
use remo_scan::Distribution;

/// Serialized form of one distribution bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketView {
    pub min: i64,
    pub max: i64,
    pub count: usize,
    pub percent: f64,
    pub gene_count: usize,
    pub gene_percent: f64,
}

/// Serialized form of a [`Distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionView {
    pub min: i64,
    pub max: i64,
    pub bucket_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_marker: Option<String>,
    pub total_matches: usize,
    pub total_genes: usize,
    pub total_genes_with_match: usize,
    pub buckets: Vec<BucketView>,
}

impl DistributionView {
    pub fn from_distribution(distribution: &Distribution) -> Self {
        DistributionView {
            min: distribution.config.min,
            max: distribution.config.max,
            bucket_size: distribution.config.bucket_size,
            align_marker: distribution.config.align_marker.clone(),
            total_matches: distribution.total_matches,
            total_genes: distribution.total_genes,
            total_genes_with_match: distribution.total_genes_with_match,
            buckets: distribution
                .data_points()
                .iter()
                .map(|dp| BucketView {
                    min: dp.min,
                    max: dp.max,
                    count: dp.count,
                    percent: dp.percent,
                    gene_count: dp.gene_count(),
                    gene_percent: dp.gene_percent,
                })
                .collect(),
        }
    }
}

/// The plain-record result shape handed back to calling layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub name: String,
    pub color: String,
    pub stroke: u32,
    pub distribution: DistributionView,
}

impl SeriesView {
    pub fn from_series(series: &AnalysisSeries) -> Self {
        SeriesView {
            name: series.name.clone(),
            color: series.color.clone(),
            stroke: series.stroke,
            distribution: DistributionView::from_distribution(&series.distribution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remo_core::models::{Gene, GeneSet};
    use remo_motif::Motif;
    use remo_scan::DistributionConfig;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn view_serializes_to_the_result_shape() {
        let set = Arc::new(GeneSet::from_parts(
            vec![Gene {
                gene_id: "g1.1".to_string(),
                sequence: "ATGACGTGCAT".to_string(),
                header: ">g1.1".to_string(),
                notes: vec![],
                expression: HashMap::new(),
                markers: HashMap::new(),
            }],
            vec![],
            None,
        ));
        let series = AnalysisSeries::run(
            set,
            Motif::new("ABRE", vec!["ACGTG".to_string()]),
            "early".to_string(),
            "early - ABRE".to_string(),
            "#336699".to_string(),
            4,
            DistributionConfig {
                min: 0,
                max: 12,
                bucket_size: 6,
                align_marker: None,
            },
            true,
        )
        .unwrap();

        let view = SeriesView::from_series(&series);
        assert_eq!(view.distribution.buckets.len(), 2);
        assert_eq!(view.distribution.total_matches, 1);
        assert_eq!(view.distribution.buckets[0].count, 1);
        assert_eq!(view.distribution.buckets[0].percent, 1.0);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "early - ABRE");
        assert_eq!(json["distribution"]["bucket_size"], 6);
        assert!(json["distribution"].get("align_marker").is_none());
    }
}
