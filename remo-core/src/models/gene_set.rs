use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::errors::{GeneSetError, ParseError};
use crate::models::gene::Gene;
use crate::models::organism::Organism;
use crate::models::selection::{RankMode, RankStrategy, StageSelection};

/// Guard added to the expression total before the percentile walk, so a
/// rounding deficit in the running sum can never make the full-set
/// percentile unreachable.
const PERCENTILE_TOTAL_GUARD: f64 = 1e-4;

///
/// An ordered, immutable collection of [`Gene`] records.
///
/// Built once by [`GeneSet::parse`] (plus [`GeneSet::from_parts`]);
/// every transformation (dedup, stage filtering) returns a new
/// `GeneSet`, so a collection can be shared read-only across
/// concurrently running analysis tasks.
///
/// `stage_membership` is present when stage assignment comes from an
/// external grouping file; otherwise stages are derived from the
/// per-gene expression annotations.
///
#[derive(Debug, Clone)]
pub struct GeneSet {
    pub organism: Option<Organism>,
    pub genes: Vec<Gene>,
    pub stage_membership: Option<IndexMap<String, HashSet<String>>>,
    pub stage_colors: Option<HashMap<String, String>>,
    pub parse_errors: Vec<ParseError>,
    expression_by_stage: OnceLock<IndexMap<String, Vec<f64>>>,
}

impl GeneSet {
    ///
    /// Parse `>`-delimited sequence text into records.
    ///
    /// A chunk that fails to parse contributes a [`ParseError`] and the
    /// rest of the text keeps parsing; empty chunks are skipped.
    ///
    pub fn parse(text: &str) -> (Vec<Gene>, Vec<ParseError>) {
        let mut genes = Vec::new();
        let mut errors = Vec::new();

        for chunk in text.split('>') {
            if chunk.trim().is_empty() {
                continue;
            }
            let rebuilt = format!(">{chunk}");
            let lines: Vec<&str> = rebuilt.split('\n').collect();
            match Gene::from_fasta_chunk(&lines) {
                Ok(gene) => genes.push(gene),
                Err(e) => errors.push(e),
            }
        }

        log::debug!(
            "sequence parsing completed with {} genes and {} errors",
            genes.len(),
            errors.len()
        );
        (genes, errors)
    }

    pub fn from_parts(
        genes: Vec<Gene>,
        parse_errors: Vec<ParseError>,
        organism: Option<Organism>,
    ) -> Self {
        GeneSet {
            organism,
            genes,
            stage_membership: None,
            stage_colors: None,
            parse_errors,
            expression_by_stage: OnceLock::new(),
        }
    }

    /// Replace the gene list, keeping everything else. The memoized
    /// expression aggregate is recomputed lazily on the copy.
    fn copy_with_genes(&self, genes: Vec<Gene>) -> Self {
        GeneSet {
            organism: self.organism.clone(),
            genes,
            stage_membership: self.stage_membership.clone(),
            stage_colors: self.stage_colors.clone(),
            parse_errors: self.parse_errors.clone(),
            expression_by_stage: OnceLock::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene_by_id(&self, gene_id: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.gene_id == gene_id)
    }

    ///
    /// Collapse splice variants to one transcript per gene code, keeping
    /// the lexicographically smallest `gene_id` of each group.
    ///
    /// This tie-break is a deterministic contract, not a biological
    /// "first transcript": `g1.10` sorts before `g1.2`.
    ///
    pub fn dedup_first_transcript(&self) -> Self {
        let mut groups: IndexMap<String, Vec<&Gene>> = IndexMap::new();
        for gene in &self.genes {
            groups.entry(gene.gene_code()).or_default().push(gene);
        }

        let mut merged = Vec::with_capacity(groups.len());
        for (_, mut variants) in groups {
            variants.sort_by(|a, b| a.gene_id.cmp(&b.gene_id));
            merged.push(variants[0].clone());
        }

        log::debug!(
            "transcript filtering completed with {} genes ({} before)",
            merged.len(),
            self.genes.len()
        );
        self.copy_with_genes(merged)
    }

    ///
    /// Per-stage multiset of expression levels, aggregated over all
    /// genes. Memoized; stage order is discovery order across the gene
    /// list.
    ///
    pub fn expression_by_stage(&self) -> &IndexMap<String, Vec<f64>> {
        self.expression_by_stage.get_or_init(|| {
            let mut result: IndexMap<String, Vec<f64>> = IndexMap::new();
            for gene in &self.genes {
                for (stage, level) in &gene.expression {
                    result.entry(stage.clone()).or_default().push(*level);
                }
            }
            result
        })
    }

    ///
    /// All stage names, in presentation order: the organism's canonical
    /// stages first (those that were actually detected), then any
    /// remaining detected stages in discovery order.
    ///
    pub fn stage_keys(&self) -> Vec<String> {
        let detected: Vec<String> = match &self.stage_membership {
            Some(membership) => membership.keys().cloned().collect(),
            None => self.expression_by_stage().keys().cloned().collect(),
        };

        match &self.organism {
            Some(organism) if !organism.stages.is_empty() => {
                let mut result: Vec<String> = organism
                    .stages
                    .iter()
                    .filter(|s| detected.contains(&s.stage))
                    .map(|s| s.stage.clone())
                    .collect();
                for stage in detected {
                    if !result.contains(&stage) {
                        result.push(stage);
                    }
                }
                result
            }
            _ => detected,
        }
    }

    /// Stage names that should be pre-selected, per the organism preset.
    pub fn default_selected_stage_keys(&self) -> Vec<String> {
        let keys = self.stage_keys();
        match &self.organism {
            Some(organism) if !organism.stages.is_empty() => organism
                .stages
                .iter()
                .filter(|s| s.checked_by_default && keys.contains(&s.stage))
                .map(|s| s.stage.clone())
                .collect(),
            _ => keys,
        }
    }

    /// stage -> color, from the explicit map or the organism preset.
    pub fn colors(&self) -> HashMap<String, String> {
        if let Some(colors) = &self.stage_colors {
            return colors.clone();
        }
        match &self.organism {
            Some(organism) => organism
                .stages
                .iter()
                .map(|s| (s.stage.clone(), s.color.clone()))
                .collect(),
            None => HashMap::new(),
        }
    }

    /// stage -> stroke width, from the organism preset.
    pub fn strokes(&self) -> HashMap<String, u32> {
        match &self.organism {
            Some(organism) => organism
                .stages
                .iter()
                .map(|s| (s.stage.clone(), s.stroke))
                .collect(),
            None => HashMap::new(),
        }
    }

    ///
    /// Narrow the collection to one stage.
    ///
    /// With `stage_membership` present this returns exactly the member
    /// records (erroring with [`GeneSetError::EmptyStage`] on an empty
    /// set). Otherwise genes are ranked ascending by their expression in
    /// `stage` (missing treated as 0) into a new ordered view — the
    /// shared gene list is never sorted in place — and the selection's
    /// strategy/mode picks the kept portion.
    ///
    pub fn filter(&self, stage: &str, selection: &StageSelection) -> Result<Self, GeneSetError> {
        if !self.stage_keys().iter().any(|s| s == stage) {
            return Err(GeneSetError::UnknownStage(stage.to_string()));
        }

        if let Some(membership) = &self.stage_membership {
            let ids = membership
                .get(stage)
                .filter(|ids| !ids.is_empty())
                .ok_or_else(|| GeneSetError::EmptyStage(stage.to_string()))?;
            let genes = self
                .genes
                .iter()
                .filter(|g| ids.contains(&g.gene_id))
                .cloned()
                .collect();
            return Ok(self.copy_with_genes(genes));
        }

        // ascending sort into a fresh view; stable so equal levels keep
        // their original relative order
        let mut sorted: Vec<&Gene> = self.genes.iter().collect();
        sorted.sort_by(|a, b| {
            let la = a.expression.get(stage).copied().unwrap_or(0.0);
            let lb = b.expression.get(stage).copied().unwrap_or(0.0);
            la.total_cmp(&lb)
        });

        let picked: Vec<Gene> = match selection.mode {
            RankMode::FixedCount => {
                let c = selection.count.min(sorted.len());
                match selection.strategy {
                    RankStrategy::Top => sorted[sorted.len() - c..]
                        .iter()
                        .map(|g| (*g).clone())
                        .collect(),
                    RankStrategy::Bottom => {
                        sorted[..c].iter().map(|g| (*g).clone()).collect()
                    }
                }
            }
            RankMode::Percentile => {
                let total: f64 = self
                    .expression_by_stage()
                    .get(stage)
                    .map(|levels| levels.iter().sum())
                    .unwrap_or(0.0);
                let target = (total + PERCENTILE_TOTAL_GUARD) * selection.percentile;

                let walk: Box<dyn Iterator<Item = &&Gene>> = match selection.strategy {
                    RankStrategy::Top => Box::new(sorted.iter().rev()),
                    RankStrategy::Bottom => Box::new(sorted.iter()),
                };

                let mut accumulated = 0.0;
                let mut picked = Vec::new();
                for gene in walk {
                    if accumulated >= target {
                        break;
                    }
                    picked.push((*gene).clone());
                    accumulated += gene.expression.get(stage).copied().unwrap_or(0.0);
                }
                picked
            }
        };

        Ok(self.copy_with_genes(picked))
    }
}
