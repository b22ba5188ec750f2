use serde::{Deserialize, Serialize};

/// Presentation metadata for one developmental stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStyle {
    #[serde(alias = "name")]
    pub stage: String,
    pub color: String,
    #[serde(default = "default_stroke")]
    pub stroke: u32,
    #[serde(default = "default_checked", alias = "is_checked_by_default")]
    pub checked_by_default: bool,
}

fn default_stroke() -> u32 {
    4
}

fn default_checked() -> bool {
    true
}

///
/// An organism preset: where its sequence file lives, whether splice
/// variants collapse to a single transcript, and how its stages are
/// presented (canonical order, colors, strokes).
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub name: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default = "default_single_transcript")]
    pub take_first_transcript_only: bool,
    #[serde(default)]
    pub stages: Vec<StageStyle>,
}

fn default_single_transcript() -> bool {
    true
}

impl Organism {
    pub fn new(name: impl Into<String>) -> Self {
        Organism {
            name: name.into(),
            filename: None,
            description: None,
            public: false,
            take_first_transcript_only: true,
            stages: Vec::new(),
        }
    }

    pub fn stage_style(&self, stage: &str) -> Option<&StageStyle> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}
