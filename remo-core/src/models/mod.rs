pub mod gene;
pub mod gene_set;
pub mod organism;
pub mod selection;

// re-export for cleaner imports
pub use self::gene::Gene;
pub use self::gene_set::GeneSet;
pub use self::organism::{Organism, StageStyle};
pub use self::selection::{RankMode, RankStrategy, StageSelection};
