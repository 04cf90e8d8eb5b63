//! Conversion of case-annotated sequences into weighted sequences.
//!
//! Uppercase positions are viewpoint positions and lowercase positions are
//! context positions. Each record becomes a normalized RNA sequence plus one
//! non-negative weight per position, optionally lowered by k-mer cleavage
//! priors.

use super::priors::PriorsTable;
use crate::utils::{Result, SequenceRecord};
use std::sync::Arc;

/// A sequence ready for vectorization.
///
/// `sequence` and `weights` always have the same length in characters.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedRecord {
    pub id: String,
    pub sequence: String,
    pub weights: Vec<f64>,
}

/// K-mer priors together with the factor used to subtract them from weights.
#[derive(Debug, Clone)]
pub struct Priors {
    table: Arc<PriorsTable>,
    weight: f64,
}

impl Priors {
    pub fn new(table: Arc<PriorsTable>, weight: f64) -> Result<Self> {
        check_weight("priors", weight)?;
        Ok(Self { table, weight })
    }

    pub fn table(&self) -> &PriorsTable {
        &self.table
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

#[derive(Debug, Clone)]
pub struct WeightConfig {
    viewpoint_weight: f64,
    context_weight: f64,
    priors: Option<Priors>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            viewpoint_weight: 1.0,
            context_weight: 0.0,
            priors: None,
        }
    }
}

impl WeightConfig {
    pub fn new(viewpoint_weight: f64, context_weight: f64, priors: Option<Priors>) -> Result<Self> {
        check_weight("viewpoint", viewpoint_weight)?;
        check_weight("context", context_weight)?;
        Ok(Self {
            viewpoint_weight,
            context_weight,
            priors,
        })
    }

    pub fn viewpoint_weight(&self) -> f64 {
        self.viewpoint_weight
    }

    pub fn context_weight(&self) -> f64 {
        self.context_weight
    }

    pub fn priors(&self) -> Option<&Priors> {
        self.priors.as_ref()
    }

    pub fn apply(&self, record: SequenceRecord) -> PreprocessedRecord {
        // Case must be read before normalization discards it
        let base = base_weights(&record.seq, self.viewpoint_weight, self.context_weight);
        let sequence = normalize_sequence(&record.seq);

        let weights = match &self.priors {
            None => base,
            Some(priors) => {
                let probs = centered_priors(&sequence, &priors.table);
                base.into_iter()
                    .zip(probs)
                    .map(|(w, p)| match p {
                        Some(p) => (w - priors.weight * p).max(0.0),
                        None => 0.0,
                    })
                    .collect()
            }
        };

        PreprocessedRecord {
            id: record.id,
            sequence,
            weights,
        }
    }
}

/// Lazily preprocesses `records` in input order.
///
/// The returned iterator is single-pass; it can only be replayed if the
/// source of `records` can.
pub fn preprocess<'a, I>(
    records: I,
    config: &'a WeightConfig,
) -> impl Iterator<Item = PreprocessedRecord> + 'a
where
    I: IntoIterator<Item = SequenceRecord>,
    I::IntoIter: 'a,
{
    records.into_iter().map(move |record| config.apply(record))
}

pub fn base_weights(seq: &str, viewpoint_weight: f64, context_weight: f64) -> Vec<f64> {
    seq.chars()
        .map(|c| {
            if c.is_uppercase() {
                viewpoint_weight
            } else {
                context_weight
            }
        })
        .collect()
}

/// Uppercases `seq` and converts DNA to RNA (`T` to `U`).
///
/// Characters whose uppercase form spans several characters (`ß`) are kept
/// as they are so that positions stay aligned with the weights.
pub fn normalize_sequence(seq: &str) -> String {
    seq.chars()
        .map(|c| match single_uppercase(c) {
            'T' => 'U',
            c => c,
        })
        .collect()
}

fn single_uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Prior probability attributed to every position of `seq`.
///
/// A k-mer's probability describes its center, so the per-start lookups are
/// rotated right by `k / 2` with wraparound. Positions without a full k-mer
/// or with an unknown k-mer get `None`.
pub fn centered_priors(seq: &str, table: &PriorsTable) -> Vec<Option<f64>> {
    let k = table.kmer_len();
    let bounds: Vec<usize> = seq
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(seq.len()))
        .collect();
    let num_positions = bounds.len() - 1;

    let mut probs: Vec<Option<f64>> = (0..num_positions)
        .map(|i| {
            bounds
                .get(i + k)
                .and_then(|&end| table.get(&seq[bounds[i]..end]))
        })
        .collect();

    if num_positions > 0 {
        probs.rotate_right((k / 2) % num_positions);
    }
    probs
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "The {} weight must be a non-negative number, got: {}",
            name, weight
        ))
    }
}
