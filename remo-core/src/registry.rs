use indexmap::IndexMap;

use crate::models::Organism;

///
/// A catalog of organism presets, keyed by organism name.
///
/// Loaded from a JSON array of presets and passed explicitly to whatever
/// needs it; there is no process-global registry.
///
#[derive(Debug, Clone, Default)]
pub struct OrganismRegistry {
    organisms: IndexMap<String, Organism>,
}

impl OrganismRegistry {
    pub fn new(organisms: Vec<Organism>) -> Self {
        OrganismRegistry {
            organisms: organisms
                .into_iter()
                .map(|o| (o.name.clone(), o))
                .collect(),
        }
    }

    /// Load presets from a JSON array. Later entries with a repeated
    /// name replace earlier ones.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let organisms: Vec<Organism> = serde_json::from_str(json)?;
        log::debug!("loaded {} organism presets", organisms.len());
        Ok(Self::new(organisms))
    }

    pub fn get(&self, name: &str) -> Option<&Organism> {
        self.organisms.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.values()
    }

    /// Presets flagged for listing in a public catalog.
    pub fn public(&self) -> Vec<&Organism> {
        self.organisms.values().filter(|o| o.public).collect()
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PRESETS: &str = r#"[
        {"name": "A. thaliana", "filename": "athaliana.fasta.gz", "public": true},
        {"name": "scratch", "public": false, "take_first_transcript_only": false}
    ]"#;

    #[test]
    fn load_and_lookup() {
        let registry = OrganismRegistry::from_json(PRESETS).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("A. thaliana").unwrap().filename.as_deref(),
            Some("athaliana.fasta.gz")
        );
        assert!(!registry.get("scratch").unwrap().take_first_transcript_only);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn public_filters_catalog() {
        let registry = OrganismRegistry::from_json(PRESETS).unwrap();
        let names: Vec<&str> = registry.public().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["A. thaliana"]);
    }
}
