use crate::errors::GeneSetError;
use crate::models::{GeneSet, StageSelection};

/// Sentinel stage name meaning "the whole collection, unranked".
pub const ALL_STAGES: &str = "__ALL__";

/// Human-readable label for a stage name, mapping the sentinel to `all`.
pub fn stage_label(stage: &str) -> &str {
    if stage == ALL_STAGES { "all" } else { stage }
}

///
/// Resolve one requested stage to the gene subset to analyze.
///
/// The [`ALL_STAGES`] sentinel bypasses ranking entirely and yields the
/// full collection; any other name goes through [`GeneSet::filter`] with
/// the given selection.
///
pub fn select_stage(
    gene_set: &GeneSet,
    stage: &str,
    selection: &StageSelection,
) -> Result<GeneSet, GeneSetError> {
    if stage == ALL_STAGES {
        return Ok(gene_set.clone());
    }
    gene_set.filter(stage, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gene, RankMode};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn gene(id: &str, level: f64) -> Gene {
        Gene {
            gene_id: id.to_string(),
            sequence: "ACGT".to_string(),
            header: format!(">{id}"),
            notes: vec![],
            expression: HashMap::from([("early".to_string(), level)]),
            markers: HashMap::new(),
        }
    }

    #[test]
    fn sentinel_returns_full_set() {
        let set = GeneSet::from_parts(vec![gene("g1.1", 1.0), gene("g2.1", 2.0)], vec![], None);
        let selection = StageSelection {
            mode: RankMode::FixedCount,
            count: 1,
            ..Default::default()
        };
        // the sentinel ignores the ranking settings
        let selected = select_stage(&set, ALL_STAGES, &selection).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn named_stage_goes_through_filter() {
        let set = GeneSet::from_parts(vec![gene("g1.1", 1.0)], vec![], None);
        assert!(select_stage(&set, "early", &StageSelection::default()).is_ok());
        assert_eq!(
            select_stage(&set, "missing", &StageSelection::default()).unwrap_err(),
            GeneSetError::UnknownStage("missing".to_string())
        );
    }

    #[test]
    fn labels() {
        assert_eq!(stage_label(ALL_STAGES), "all");
        assert_eq!(stage_label("early"), "early");
    }
}
