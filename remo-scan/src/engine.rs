use std::sync::OnceLock;
use std::thread;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use remo_core::models::{Gene, GeneSet};
use remo_motif::Motif;

use crate::errors::ScanError;

/// Record count above which a scan fans out across the worker pool.
/// Below it, pool overhead dominates and the scan runs inline.
const PARALLEL_THRESHOLD: usize = 10;

/// Upper bound on scan worker threads.
const MAX_WORKERS: usize = 8;

fn scan_pool() -> &'static rayon::ThreadPool {
    static POOL: OnceLock<rayon::ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
        let workers = available.saturating_sub(1).clamp(1, MAX_WORKERS);
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("remo-scan-{i}"))
            .build()
            .expect("failed to build scan worker pool")
    })
}

///
/// One motif occurrence in one gene.
///
/// `raw_position` is the 0-based start offset of the match;
/// `position` is the midpoint offset used for distribution binning.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifMatch {
    pub gene_id: String,
    pub motif_name: String,
    /// The concrete definition string that matched (forward or
    /// reverse-complement).
    pub matched_definition: String,
    pub matched_text: String,
    pub raw_position: usize,
    pub position: usize,
}

///
/// Scan one gene with every definition of a motif, forward and
/// reverse-complement.
///
pub fn find_matches(
    gene: &Gene,
    motif: &Motif,
    suppress_overlaps: bool,
) -> Result<Vec<MotifMatch>, ScanError> {
    let patterns = motif.scan_patterns()?;
    Ok(scan_record(gene, &motif.name, &patterns, suppress_overlaps))
}

fn scan_record(
    gene: &Gene,
    motif_name: &str,
    patterns: &[(String, Regex)],
    suppress_overlaps: bool,
) -> Vec<MotifMatch> {
    let mut matches = Vec::new();
    for (definition, pattern) in patterns {
        for m in pattern.find_iter(&gene.sequence) {
            let mid_delta = m.len() / 2;
            matches.push(MotifMatch {
                gene_id: gene.gene_id.clone(),
                motif_name: motif_name.to_string(),
                matched_definition: definition.clone(),
                matched_text: m.as_str().to_string(),
                raw_position: m.start(),
                position: m.start() + mid_delta,
            });
        }
    }
    if suppress_overlaps {
        suppress_overlapping(matches)
    } else {
        matches
    }
}

///
/// Greedy earliest-start overlap resolution.
///
/// Matches are sorted ascending by start; a candidate is accepted iff it
/// starts at or after the end of the last accepted match. This is a
/// deterministic leftmost-biased sweep, not an optimal interval
/// scheduler, and callers depend on exactly this rule.
///
pub fn suppress_overlapping(mut matches: Vec<MotifMatch>) -> Vec<MotifMatch> {
    matches.sort_by_key(|m| m.raw_position);

    let mut accepted = Vec::with_capacity(matches.len());
    let mut last_end = 0usize;
    for m in matches {
        if m.raw_position >= last_end {
            last_end = m.raw_position + m.matched_text.len();
            accepted.push(m);
        }
    }
    accepted
}

///
/// Scan a whole gene set for one motif.
///
/// The motif's patterns are compiled once; records are scanned
/// independently, fanning out across the worker pool when the set is
/// large enough. Match order follows gene order either way.
///
pub fn scan_gene_set(
    gene_set: &GeneSet,
    motif: &Motif,
    suppress_overlaps: bool,
) -> Result<Vec<MotifMatch>, ScanError> {
    let patterns = motif.scan_patterns()?;

    let per_gene: Vec<Vec<MotifMatch>> = if gene_set.len() > PARALLEL_THRESHOLD {
        scan_pool().install(|| {
            gene_set
                .genes
                .par_iter()
                .map(|gene| scan_record(gene, &motif.name, &patterns, suppress_overlaps))
                .collect()
        })
    } else {
        gene_set
            .genes
            .iter()
            .map(|gene| scan_record(gene, &motif.name, &patterns, suppress_overlaps))
            .collect()
    };

    let matches: Vec<MotifMatch> = per_gene.into_iter().flatten().collect();
    log::debug!(
        "scan of `{}` over {} genes found {} matches",
        motif.name,
        gene_set.len(),
        matches.len()
    );
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
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

    fn raw(id: &str, raw_position: usize, text: &str) -> MotifMatch {
        MotifMatch {
            gene_id: id.to_string(),
            motif_name: "m".to_string(),
            matched_definition: text.to_string(),
            matched_text: text.to_string(),
            raw_position,
            position: raw_position + text.len() / 2,
        }
    }

    #[test]
    fn single_forward_match() {
        let motif = Motif::new("ABRE", vec!["ACGTG".to_string()]);
        let matches = find_matches(&gene("g1.1", "ATGACGTGCAT"), &motif, false).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_position, 3);
        assert_eq!(matches[0].matched_text, "ACGTG");
        assert_eq!(matches[0].position, 5);
    }

    #[test]
    fn reverse_complement_is_scanned() {
        // CACGT is the reverse complement of ACGTG
        let motif = Motif::new("ABRE", vec!["ACGTG".to_string()]);
        let matches = find_matches(&gene("g1.1", "TTCACGTTT"), &motif, false).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_definition, "CACGT");
        assert_eq!(matches[0].raw_position, 2);
    }

    #[test]
    fn palindrome_counted_once() {
        let motif = Motif::new("G-box", vec!["CACGTG".to_string()]);
        let matches = find_matches(&gene("g1.1", "TTCACGTGTT"), &motif, false).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn overlap_suppression_keeps_earliest_start() {
        let survivors = suppress_overlapping(vec![raw("g", 2, "ACGT"), raw("g", 0, "ACGT")]);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].raw_position, 0);
    }

    #[test]
    fn adjacent_matches_both_survive() {
        let survivors = suppress_overlapping(vec![raw("g", 0, "ACGT"), raw("g", 4, "ACGT")]);
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn overlap_suppression_is_idempotent() {
        let input = vec![
            raw("g", 0, "ACGT"),
            raw("g", 2, "ACGT"),
            raw("g", 4, "ACGT"),
            raw("g", 9, "ACGT"),
        ];
        let once = suppress_overlapping(input);
        let twice = suppress_overlapping(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn greedy_rule_is_not_optimal_scheduling() {
        // a long early match shadows two short later ones; the greedy
        // sweep keeps the early one even though dropping it would keep
        // more matches overall
        let survivors = suppress_overlapping(vec![
            raw("g", 0, "ACGTACGT"),
            raw("g", 1, "ACG"),
            raw("g", 5, "ACG"),
        ]);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].raw_position, 0);
    }

    #[test]
    fn scan_gene_set_parallel_matches_sequential() {
        let motif = Motif::new("DOF", vec!["AAAG".to_string()]);
        let genes: Vec<Gene> = (0..25)
            .map(|i| gene(&format!("g{i}.1"), "TTAAAGTTTTAAAGTT"))
            .collect();

        let small = GeneSet::from_parts(genes[..3].to_vec(), vec![], None);
        let large = GeneSet::from_parts(genes, vec![], None);

        let small_matches = scan_gene_set(&small, &motif, true).unwrap();
        let large_matches = scan_gene_set(&large, &motif, true).unwrap();

        assert_eq!(small_matches.len(), 3 * 2);
        assert_eq!(large_matches.len(), 25 * 2);
        // parallel fan-out preserves gene order
        let ids: Vec<&str> = large_matches
            .iter()
            .map(|m| m.gene_id.as_str())
            .collect();
        let mut sorted_by_gene = ids.clone();
        sorted_by_gene.sort_by_key(|id| {
            id.trim_start_matches('g')
                .trim_end_matches(".1")
                .parse::<usize>()
                .unwrap()
        });
        assert_eq!(ids, sorted_by_gene);
    }
}
