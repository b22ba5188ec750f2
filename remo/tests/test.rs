use std::io::Write;
use std::sync::Arc;

use rstest::*;
use tempfile::tempdir;

use remo::core::models::{GeneSet, StageSelection};
use remo::motif::Motif;
use remo::scan::{Distribution, DistributionConfig, find_matches};

#[fixture]
fn variant_fasta() -> &'static str {
    ">g1.1;MARKERS {\"atg\":1}\nATGACGTGCAT\n>g1.2\nATGACGTGCAT\n"
}

mod tests {
    use remo::core::ALL_STAGES;
    use remo::export::SeriesView;
    use remo::pipeline::{Analyzer, FsSource, GeneSetCache, load_for_organism};
    use remo::scan::suppress_overlapping;

    use super::*;

    #[rstest]
    fn single_transcript_dedup_keeps_smallest_id(variant_fasta: &str) {
        let (genes, errors) = GeneSet::parse(variant_fasta);
        assert!(errors.is_empty());
        assert_eq!(genes.len(), 2);

        let deduped = GeneSet::from_parts(genes, vec![], None).dedup_first_transcript();
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped.genes[0].gene_id, "g1.1");
    }

    #[test]
    fn forward_match_positions() {
        let (genes, _) = GeneSet::parse(">g1.1\nATGACGTGCAT\n");
        let motif = Motif::new("ABRE", vec!["ACGTG".to_string()]);

        let matches = find_matches(&genes[0], &motif, false).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_position, 3);
        assert_eq!(matches[0].matched_text, "ACGTG");
    }

    #[test]
    fn overlapping_matches_keep_the_earliest() {
        // forward ACGTA at 0 and reverse-complement TACGT at 3 overlap
        let (genes, _) = GeneSet::parse(">g1.1\nACGTACGTT\n");
        let motif = Motif::new("tandem", vec!["ACGTA".to_string()]);

        let unsuppressed = find_matches(&genes[0], &motif, false).unwrap();
        assert_eq!(unsuppressed.len(), 2);

        let matches = find_matches(&genes[0], &motif, true).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_position, 0);
        assert_eq!(suppress_overlapping(unsuppressed).len(), 1);
    }

    #[test]
    fn distribution_bucket_placement() {
        let (genes, _) = GeneSet::parse(">g1.1\nACGT\n");
        let set = GeneSet::from_parts(genes, vec![], None);

        let matches = vec![remo::scan::MotifMatch {
            gene_id: "g1.1".to_string(),
            motif_name: "m".to_string(),
            matched_definition: "AC".to_string(),
            matched_text: "AC".to_string(),
            raw_position: 0,
            position: 0,
        }];
        let dist = Distribution::build(
            &matches,
            &set,
            DistributionConfig {
                min: -10,
                max: 10,
                bucket_size: 5,
                align_marker: None,
            },
        )
        .unwrap();

        let points = dist.data_points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[2].min, 0);
        assert_eq!(points[2].count, 1);
        assert_eq!(points.iter().map(|p| p.count).sum::<usize>(), 1);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn full_pipeline_from_gzipped_file(variant_fasta: &str) {
        let dir = tempdir().unwrap();
        let file = std::fs::File::create(dir.path().join("plant.fasta.gz")).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());

        // two genes with expression annotations plus the splice variants
        write!(
            encoder,
            ">g2.1;TRANSCRIPTION_RATES {{\"early\": 9.0}}\nTTCACGTGTT\n{variant_fasta}"
        )
        .unwrap();
        encoder.finish().unwrap();

        let cache = GeneSetCache::new(Arc::new(FsSource::new(dir.path())));
        let gene_set = load_for_organism(&cache, "plant.fasta.gz", None)
            .await
            .unwrap();
        assert_eq!(gene_set.len(), 2); // g1 variants collapsed

        let mut analyzer = Analyzer::new();
        analyzer.set_gene_set(gene_set);
        analyzer.set_motifs(vec![Motif::new("ABRE", vec!["ACGTG".to_string()])]);
        analyzer.set_selection(StageSelection {
            selected_stages: vec![ALL_STAGES.to_string()],
            ..Default::default()
        });
        analyzer.set_options(DistributionConfig {
            min: 0,
            max: 12,
            bucket_size: 3,
            align_marker: None,
        });

        analyzer.analyze().await.unwrap();
        let results = analyzer.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "all - ABRE");
        // one forward match in g1.1, one reverse-complement match in g2.1
        assert_eq!(results[0].matches.len(), 2);

        let view = SeriesView::from_series(&results[0]);
        assert_eq!(view.distribution.total_genes, 2);
        assert_eq!(view.distribution.total_genes_with_match, 2);
    }
}
