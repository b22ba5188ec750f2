use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Marker name whose offset must point at a start codon.
pub const START_CODON_MARKER: &str = "atg";

fn gene_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9+_.-]+").unwrap())
}

fn markers_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r";MARKERS (\{.*})$").unwrap())
}

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r";TRANSCRIPTION_RATES (\{.*})$").unwrap())
}

///
/// One gene sequence record, parsed from a single `>`-delimited chunk.
///
/// `gene_id` includes the splice variant suffix (e.g. `ATG0001.1`);
/// `sequence` is the concatenated, uppercased nucleotide data.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub gene_id: String,
    pub sequence: String,
    pub header: String,
    pub notes: Vec<String>,
    /// stage name -> expression level
    pub expression: HashMap<String, f64>,
    /// marker name -> 1-based offset within `sequence`
    pub markers: HashMap<String, i64>,
}

impl Gene {
    /// Parse one record from the lines of a `>`-delimited chunk.
    ///
    /// The first `>` line is the header and must contain a gene id.
    /// Lines starting with `;` are annotation notes; two embedded-JSON
    /// annotations are recognized (`;MARKERS {..}` and
    /// `;TRANSCRIPTION_RATES {..}`, both flat string->number objects).
    /// Everything else is sequence data, uppercased and concatenated.
    pub fn from_fasta_chunk(lines: &[&str]) -> Result<Gene, ParseError> {
        let mut header: Option<String> = None;
        let mut gene_id: Option<String> = None;
        let mut notes: Vec<String> = Vec::new();
        let mut data = String::new();
        let mut expression: HashMap<String, f64> = HashMap::new();
        let mut markers: HashMap<String, i64> = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(first) = line.chars().next() {
                match first {
                    '>' => {
                        if header.is_some() {
                            return Err(ParseError::DuplicateHeader(line.to_string()));
                        }
                        header = Some(line.to_string());
                        gene_id = gene_id_re()
                            .find_iter(line)
                            .map(|m| m.as_str().to_string())
                            .next();
                        if gene_id.is_none() {
                            log::warn!("no gene id found in header: {line}");
                        }
                    }
                    ';' => {
                        if let Some(caps) = expression_re().captures(line) {
                            expression = parse_number_map(&caps[1], line)?
                                .into_iter()
                                .collect();
                        }
                        if let Some(caps) = markers_re().captures(line) {
                            markers = parse_number_map(&caps[1], line)?
                                .into_iter()
                                .map(|(k, v)| (k, v as i64))
                                .collect();
                        }
                        notes.push(line.to_string());
                    }
                    _ => data.push_str(&line.trim().to_uppercase()),
                }
            }
        }

        let Some(header) = header else {
            return Err(ParseError::MissingHeader(
                lines.first().unwrap_or(&"").to_string(),
            ));
        };
        let Some(gene_id) = gene_id else {
            return Err(ParseError::MissingGeneId(header));
        };

        // A reserved start-codon marker must point at an actual start
        // codon (either strand's spelling). Violations fail the chunk.
        if let Some(&pos) = markers.get(START_CODON_MARKER) {
            let start = (pos - 1).max(0) as usize;
            let codon = data.get(start..start + 3).unwrap_or("");
            if codon != "ATG" && codon != "CAT" {
                return Err(ParseError::BadStartCodon {
                    gene_id,
                    position: pos,
                    codon: codon.to_string(),
                });
            }
        }

        Ok(Gene {
            gene_id,
            sequence: data,
            header,
            notes,
            expression,
            markers,
        })
    }

    /// The gene id without its splice variant suffix.
    ///
    /// `ATG0001.1` -> `ATG0001`; an id without a `.` is returned as-is.
    pub fn gene_code(&self) -> String {
        let items: Vec<&str> = self.gene_id.split('.').collect();
        let cutoff = (items.len().saturating_sub(1)).max(1);
        items[..cutoff].join(".")
    }

    /// The splice variant suffix, e.g. `1` for `ATG0001.1`.
    pub fn splice_variant(&self) -> &str {
        self.gene_id.rsplit('.').next().unwrap_or(&self.gene_id)
    }
}

fn parse_number_map(json: &str, line: &str) -> Result<Vec<(String, f64)>, ParseError> {
    let value: HashMap<String, serde_json::Value> =
        serde_json::from_str(json).map_err(|e| ParseError::BadAnnotation {
            line: line.to_string(),
            message: e.to_string(),
        })?;
    let mut out = Vec::with_capacity(value.len());
    for (k, v) in value {
        let num = v.as_f64().ok_or_else(|| ParseError::BadAnnotation {
            line: line.to_string(),
            message: format!("value for `{k}` is not a number"),
        })?;
        out.push((k, num));
    }
    Ok(out)
}
