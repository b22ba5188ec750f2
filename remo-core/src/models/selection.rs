use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Which end of the expression ranking to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankStrategy {
    Top,
    Bottom,
}

/// How the kept portion of the ranking is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    Percentile,
    FixedCount,
}

///
/// Which stages to analyze and how to narrow the gene set for each one.
///
/// Pure configuration; consumed by [`crate::GeneSet::filter`] and the
/// stage selector. `percentile` is used in [`RankMode::Percentile`] mode,
/// `count` in [`RankMode::FixedCount`] mode.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSelection {
    pub selected_stages: Vec<String>,
    pub strategy: RankStrategy,
    pub mode: RankMode,
    pub percentile: f64,
    pub count: usize,
}

impl Default for StageSelection {
    fn default() -> Self {
        StageSelection {
            selected_stages: Vec::new(),
            strategy: RankStrategy::Top,
            mode: RankMode::Percentile,
            percentile: 0.9,
            count: 3200,
        }
    }
}

impl Display for StageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.selected_stages.len();
        let strategy = match self.strategy {
            RankStrategy::Top => "top",
            RankStrategy::Bottom => "bottom",
        };
        match self.mode {
            RankMode::FixedCount => write!(f, "{n} stages: {strategy} {}", self.count),
            RankMode::Percentile => {
                write!(f, "{n} stages: {strategy} {:.0}th", self.percentile * 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_formats() {
        let mut sel = StageSelection {
            selected_stages: vec!["early".into(), "late".into()],
            ..Default::default()
        };
        assert_eq!(sel.to_string(), "2 stages: top 90th");

        sel.mode = RankMode::FixedCount;
        sel.strategy = RankStrategy::Bottom;
        sel.count = 100;
        assert_eq!(sel.to_string(), "2 stages: bottom 100");
    }
}
