use std::sync::Arc;

use indexmap::IndexMap;

use remo_core::models::GeneSet;
use remo_motif::Motif;
use remo_scan::{Distribution, DistributionConfig, MotifMatch, scan_gene_set};

use crate::errors::PipelineError;

///
/// One completed analysis: a motif scanned over one stage's gene subset,
/// with the resulting matches and positional distribution.
///
/// The gene subset is retained so exporters can join matches back to
/// expression levels and marker offsets.
///
#[derive(Debug, Clone)]
pub struct AnalysisSeries {
    pub name: String,
    pub motif: Motif,
    pub stage: String,
    pub color: String,
    pub stroke: u32,
    pub visible: bool,
    pub suppress_overlaps: bool,
    pub gene_set: Arc<GeneSet>,
    pub matches: Vec<MotifMatch>,
    pub distribution: Distribution,
}

impl AnalysisSeries {
    ///
    /// Scan `gene_set` for `motif` and bin the matches.
    ///
    /// Synchronous and CPU-bound; the orchestrator runs it on a blocking
    /// worker.
    ///
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        gene_set: Arc<GeneSet>,
        motif: Motif,
        stage: String,
        name: String,
        color: String,
        stroke: u32,
        config: DistributionConfig,
        suppress_overlaps: bool,
    ) -> Result<Self, PipelineError> {
        let matches = scan_gene_set(&gene_set, &motif, suppress_overlaps)?;
        let distribution = Distribution::build(&matches, &gene_set, config)?;

        log::info!(
            "series `{name}`: {} matches over {} genes",
            matches.len(),
            gene_set.len()
        );

        Ok(AnalysisSeries {
            name,
            motif,
            stage,
            color,
            stroke,
            visible: true,
            suppress_overlaps,
            gene_set,
            matches,
            distribution,
        })
    }

    /// Matches grouped by gene id, in match order.
    pub fn results_map(&self) -> IndexMap<&str, Vec<&MotifMatch>> {
        let mut map: IndexMap<&str, Vec<&MotifMatch>> = IndexMap::new();
        for m in &self.matches {
            map.entry(m.gene_id.as_str()).or_default().push(m);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remo_core::models::Gene;
    use std::collections::HashMap;

    fn gene(id: &str, sequence: &str) -> Gene {
        Gene {
            gene_id: id.to_string(),
            sequence: sequence.to_string(),
            header: format!(">{id}"),
            notes: vec![],
            expression: HashMap::new(),
            markers: HashMap::new(),
        }
    }

    #[test]
    fn run_scans_and_bins() {
        let set = Arc::new(GeneSet::from_parts(
            vec![gene("g1.1", "ATGACGTGCAT"), gene("g2.1", "TTTTTTTT")],
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
                bucket_size: 3,
                align_marker: None,
            },
            true,
        )
        .unwrap();

        assert_eq!(series.matches.len(), 1);
        assert_eq!(series.distribution.total_matches, 1);
        assert_eq!(series.distribution.total_genes, 2);

        let map = series.results_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["g1.1"].len(), 1);
    }
}
