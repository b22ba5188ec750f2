use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::MotifError;

/// The supported IUPAC nucleotide codes.
///
/// Codes via <https://www.genome.jp/kegg/catalog/codes1.html>.
pub const SUPPORTED_CODES: [char; 16] = [
    'A', 'G', 'C', 'T', 'U', 'R', 'Y', 'N', 'W', 'S', 'M', 'K', 'B', 'H', 'D', 'V',
];

fn definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[AGCTURYNWSMKBHDV]+$").unwrap())
}

/// The IUPAC complement of a single code.
///
/// Degenerate codes map to their degenerate complement (`R↔Y`, `M↔K`,
/// `B↔V`, `H↔D`); `N`, `W` and `S` are self-complementary.
pub fn complement(code: char) -> Result<char, MotifError> {
    Ok(match code {
        'A' => 'T',
        'G' => 'C',
        'C' => 'G',
        'T' => 'A',
        'U' => 'A',
        'R' => 'Y',
        'Y' => 'R',
        'N' => 'N',
        'W' => 'W',
        'S' => 'S',
        'M' => 'K',
        'K' => 'M',
        'B' => 'V',
        'H' => 'D',
        'D' => 'H',
        'V' => 'B',
        other => return Err(MotifError::UnsupportedCode(other)),
    })
}

/// The regex fragment matching one IUPAC code.
///
/// Degenerate classes include the degenerate codes they cover, so a
/// pattern also matches sequence text that itself contains ambiguity
/// codes (`R` matches a literal `R` as well as `A` or `G`). `U` matches
/// `A` in the DNA sequence text, like its complement table entry.
fn code_class(code: char) -> Result<&'static str, MotifError> {
    Ok(match code {
        'A' => "A",
        'G' => "G",
        'C' => "C",
        'T' => "T",
        'U' => "A",
        'R' => "[RAG]",
        'Y' => "[YCT]",
        'N' => ".",
        'W' => "[WAT]",
        'S' => "[SGC]",
        'M' => "[MAC]",
        'K' => "[KGT]",
        'B' => "[BSYKGCT]",
        'H' => "[HMYWACT]",
        'D' => "[DRKWAGT]",
        'V' => "[VRSMAGC]",
        other => return Err(MotifError::UnsupportedCode(other)),
    })
}

/// Validate a list of motif definitions.
pub fn validate<S: AsRef<str>>(definitions: &[S]) -> Result<(), MotifError> {
    if definitions.is_empty() {
        return Err(MotifError::EmptyDefinition);
    }
    for definition in definitions {
        if !definition_re().is_match(definition.as_ref()) {
            return Err(MotifError::InvalidMotif(definition.as_ref().to_string()));
        }
    }
    Ok(())
}

///
/// Compile an IUPAC definition into a matchable pattern.
///
/// `strict` anchors the pattern to the whole input instead of matching a
/// substring. Compilation is pure: the same definition always yields an
/// equivalent pattern.
///
pub fn compile(definition: &str, strict: bool) -> Result<Regex, MotifError> {
    let mut pattern = String::with_capacity(definition.len() * 2 + 2);
    if strict {
        pattern.push('^');
    }
    for code in definition.chars() {
        pattern.push_str(code_class(code)?);
    }
    if strict {
        pattern.push('$');
    }
    // fragments are built from the fixed class table, so this can only
    // fail on a pathological definition length
    Regex::new(&pattern).map_err(|_| MotifError::InvalidMotif(definition.to_string()))
}

/// Reverse-complement a definition through the IUPAC complement table.
pub fn reverse_complement(definition: &str) -> Result<String, MotifError> {
    definition.chars().rev().map(complement).collect()
}

///
/// The concrete codes a degenerate code can stand for.
///
/// `N` expands to the full supported alphabet; a concrete base returns
/// the empty set (nothing to drill into).
///
pub fn drill_down(code: char) -> Result<BTreeSet<char>, MotifError> {
    Ok(match code {
        'A' | 'G' | 'C' | 'T' | 'U' => BTreeSet::new(),
        'R' => BTreeSet::from(['A', 'G']),
        'Y' => BTreeSet::from(['C', 'T']),
        'N' => SUPPORTED_CODES.into_iter().collect(),
        'W' => BTreeSet::from(['A', 'T']),
        'S' => BTreeSet::from(['G', 'C']),
        'M' => BTreeSet::from(['A', 'C']),
        'K' => BTreeSet::from(['G', 'T']),
        'B' => BTreeSet::from(['S', 'Y', 'K', 'G', 'C', 'T']),
        'H' => BTreeSet::from(['M', 'Y', 'W', 'A', 'C', 'T']),
        'D' => BTreeSet::from(['R', 'K', 'W', 'A', 'G', 'T']),
        'V' => BTreeSet::from(['R', 'S', 'M', 'A', 'G', 'C']),
        other => return Err(MotifError::UnsupportedCode(other)),
    })
}

///
/// A named motif: one or more IUPAC definitions plus catalog flags.
///
/// The definitions are the forward strand; reverse-complement
/// definitions and compiled patterns are derived on demand.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motif {
    pub name: String,
    pub definitions: Vec<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl Motif {
    pub fn new(name: impl Into<String>, definitions: Vec<String>) -> Self {
        Motif {
            name: name.into(),
            definitions,
            is_custom: false,
            is_public: true,
        }
    }

    /// A stable identifier: the definitions joined by comma.
    pub fn id(&self) -> String {
        self.definitions.join(",")
    }

    pub fn validate(&self) -> Result<(), MotifError> {
        validate(&self.definitions)
    }

    /// The reverse-complement of every definition, in definition order.
    pub fn reverse_definitions(&self) -> Result<Vec<String>, MotifError> {
        self.definitions
            .iter()
            .map(|d| reverse_complement(d))
            .collect()
    }

    ///
    /// Every definition to scan with, forward first then
    /// reverse-complement, each paired with its compiled pattern.
    ///
    /// Deduplicated by definition string, so a palindromic definition is
    /// scanned once rather than double-counted.
    ///
    pub fn scan_patterns(&self) -> Result<Vec<(String, Regex)>, MotifError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut patterns = Vec::new();
        for definition in self.definitions.iter().cloned() {
            if seen.insert(definition.clone()) {
                let pattern = compile(&definition, false)?;
                patterns.push((definition, pattern));
            }
        }
        for definition in self.reverse_definitions()? {
            if seen.insert(definition.clone()) {
                let pattern = compile(&definition, false)?;
                patterns.push((definition, pattern));
            }
        }
        Ok(patterns)
    }
}
