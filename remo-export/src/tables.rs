use serde::Serialize;

use remo_pipeline::AnalysisSeries;
use remo_scan::Distribution;

/// One gene of the per-gene table: id, how many matches it carried,
/// and its expression level per stage (column order follows
/// [`GeneTable::stages`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneRow {
    pub gene_id: String,
    pub match_count: usize,
    pub expression: Vec<Option<f64>>,
}

///
/// The per-gene table of one analysis series.
///
/// The renderer (spreadsheet, CSV) lives outside this crate; this is
/// the logical table only.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneTable {
    pub stages: Vec<String>,
    pub rows: Vec<GeneRow>,
}

impl GeneTable {
    pub fn from_series(series: &AnalysisSeries) -> Self {
        let stages = series.gene_set.stage_keys();
        let results_map = series.results_map();

        let rows = series
            .gene_set
            .genes
            .iter()
            .map(|gene| GeneRow {
                gene_id: gene.gene_id.clone(),
                match_count: results_map
                    .get(gene.gene_id.as_str())
                    .map_or(0, |matches| matches.len()),
                expression: stages
                    .iter()
                    .map(|stage| gene.expression.get(stage).copied())
                    .collect(),
            })
            .collect();

        GeneTable { stages, rows }
    }
}

/// One bucket of the per-bucket table: interval label plus the ids of
/// the genes matched inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRow {
    pub label: String,
    pub gene_ids: Vec<String>,
}

pub fn bucket_table(distribution: &Distribution) -> Vec<BucketRow> {
    distribution
        .data_points()
        .iter()
        .map(|dp| BucketRow {
            label: dp.label(),
            gene_ids: dp.gene_ids.iter().cloned().collect(),
        })
        .collect()
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

    fn gene(id: &str, sequence: &str, level: f64) -> Gene {
        Gene {
            gene_id: id.to_string(),
            sequence: sequence.to_string(),
            header: format!(">{id}"),
            notes: vec![],
            expression: HashMap::from([("early".to_string(), level)]),
            markers: HashMap::new(),
        }
    }

    fn series() -> AnalysisSeries {
        let set = Arc::new(GeneSet::from_parts(
            vec![
                gene("g1.1", "ATGACGTGCAT", 5.0),
                gene("g2.1", "TTTTTTTT", 3.0),
            ],
            vec![],
            None,
        ));
        AnalysisSeries::run(
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
        .unwrap()
    }

    #[test]
    fn gene_table_joins_matches_and_expression() {
        let table = GeneTable::from_series(&series());
        assert_eq!(table.stages, vec!["early"]);
        assert_eq!(table.rows.len(), 2);

        assert_eq!(table.rows[0].gene_id, "g1.1");
        assert_eq!(table.rows[0].match_count, 1);
        assert_eq!(table.rows[0].expression, vec![Some(5.0)]);

        assert_eq!(table.rows[1].match_count, 0);
        assert_eq!(table.rows[1].expression, vec![Some(3.0)]);
    }

    #[test]
    fn bucket_table_lists_matched_genes_per_interval() {
        let s = series();
        let rows = bucket_table(&s.distribution);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "<0; 6)");
        // the ACGTG match midpoint lands at 5
        assert_eq!(rows[0].gene_ids, vec!["g1.1"]);
        assert!(rows[1].gene_ids.is_empty());
    }
}
