use crate::motif::Motif;

///
/// A catalog of motif presets, sorted by name.
///
/// Built once from a static list or a JSON array and passed explicitly
/// to callers; there is no process-global catalog.
///
#[derive(Debug, Clone, Default)]
pub struct MotifRegistry {
    motifs: Vec<Motif>,
}

impl MotifRegistry {
    pub fn new(mut motifs: Vec<Motif>) -> Self {
        motifs.sort_by(|a, b| a.name.cmp(&b.name));
        MotifRegistry { motifs }
    }

    /// Load presets from a JSON array of motifs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let motifs: Vec<Motif> = serde_json::from_str(json)?;
        log::debug!("loaded {} motif presets", motifs.len());
        Ok(Self::new(motifs))
    }

    /// The built-in preset catalog.
    pub fn builtin() -> Self {
        let motif = |name: &str, definitions: &[&str]| {
            Motif::new(name, definitions.iter().map(|d| d.to_string()).collect())
        };
        let private = |name: &str, definitions: &[&str]| {
            let mut m = motif(name, definitions);
            m.is_public = false;
            m
        };

        Self::new(vec![
            motif("ABRE", &["ACGTG"]),
            motif("ARR10_core", &["GATY"]),
            motif("BR_response element", &["CGTGYG"]),
            motif("CAAT-box", &["CCAATT"]),
            motif("DOF_core motif", &["AAAG"]),
            motif("DRE/CRT element", &["CCGAC"]),
            motif("E-box", &["CANNTG"]),
            motif("G-box", &["CACGTG"]),
            motif("GCC-box", &["GCCGCC"]),
            motif("GTGA motif", &["GTGA"]),
            motif("I-box", &["GATAAG"]),
            motif("pollen Q-element", &["AGGTCA"]),
            motif("POLLEN1_LeLAT52", &["AGAAA"]),
            motif("TATA-box", &["TATAWA"]),
            private(
                "Arabidopsis.telobox",
                &[
                    "CCCTAAAC", "CCTAAACC", "CTAAACCC", "TAAACCCT", "AAACCCTA", "AACCCTAA",
                    "ACCCTAAA",
                ],
            ),
            private("Arabidopsis.telobox.generic", &["NGGNNTN", "NGGNTN"]),
            private(
                "Arabidopsis.siteII",
                &["TGGGCC", "TGGGCT", "GGNCCCAC", "GTGGNCCC"],
            ),
            private(
                "Allium.Cepa.telobox",
                &[
                    "CTCGGTTATGGGC", "TCGGTTATGGGCT", "CGGTTATGGGCTC", "GGTTATGGGCTCG",
                    "GTTATGGGCTCGG", "TTATGGGCTCGGT", "TATGGGCTCGGTT", "ATGGGCTCGGTTA",
                    "TGGGCTCGGTTAT", "GGGCTCGGTTATG", "GGCTCGGTTATGG", "GCTCGGTTATGGG",
                ],
            ),
            private(
                "Allium.Cepa.7Nt",
                &[
                    "TATGGGC", "ATGGGCT", "TGGGCTC", "GGGCTCG", "GGCTCGG", "GCTCGGT", "CTCGGTT",
                    "TCGGTTA", "CGGTTAT", "GGTTATG", "GTTATGG", "TTATGGG",
                ],
            ),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Motif> {
        self.motifs.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Motif> {
        self.motifs.iter()
    }

    /// Presets flagged for listing in a public catalog.
    pub fn public(&self) -> Vec<&Motif> {
        self.motifs.iter().filter(|m| m.is_public).collect()
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_is_sorted_and_valid() {
        let registry = MotifRegistry::builtin();
        assert!(!registry.is_empty());

        let names: Vec<&str> = registry.iter().map(|m| m.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        for motif in registry.iter() {
            motif.validate().unwrap();
        }
    }

    #[test]
    fn public_excludes_private_presets() {
        let registry = MotifRegistry::builtin();
        assert!(registry.public().len() < registry.len());
        assert!(registry.get("Arabidopsis.telobox").is_some());
        assert!(
            registry
                .public()
                .iter()
                .all(|m| m.name != "Arabidopsis.telobox")
        );
    }

    #[test]
    fn lookup_by_name() {
        let registry = MotifRegistry::builtin();
        let gbox = registry.get("G-box").unwrap();
        assert_eq!(gbox.definitions, vec!["CACGTG"]);
        assert!(registry.get("missing").is_none());
    }
}
