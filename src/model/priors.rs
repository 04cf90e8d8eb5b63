use crate::utils::{open_text_reader, Result};
use std::{collections::HashMap, io::BufRead, path::Path};

/// Cleavage probabilities of fixed-length k-mers.
///
/// The table is immutable once loaded and every key has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorsTable {
    kmer_len: usize,
    probs: HashMap<String, f64>,
}

impl PriorsTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        Self::from_reader(reader).map_err(|e| format!("Priors file {}: {}", path.display(), e))
    }

    /// Builds a table from in-memory `(kmer, probability)` pairs with the
    /// same checks as [`PriorsTable::from_reader`].
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut builder = TableBuilder::default();
        for (kmer, prob) in entries {
            builder.insert(&kmer, prob)?;
        }
        builder.build()
    }

    /// Parses `kmer probability` lines; blank lines are skipped and any
    /// malformed line fails the whole table.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        const EXPECTED_FIELD_COUNT: usize = 2;
        let mut builder = TableBuilder::default();

        for (line_number, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != EXPECTED_FIELD_COUNT {
                return Err(format!(
                    "Expected {} fields in the format 'kmer probability' at line {}, found {}: {}",
                    EXPECTED_FIELD_COUNT,
                    line_number + 1,
                    fields.len(),
                    line
                ));
            }

            let (kmer, prob_str) = (fields[0], fields[1]);
            let prob = prob_str.parse::<f64>().map_err(|e| {
                format!(
                    "Invalid probability at line {}: '{}' ({})",
                    line_number + 1,
                    prob_str,
                    e
                )
            })?;
            builder
                .insert(kmer, prob)
                .map_err(|e| format!("{} at line {}", e, line_number + 1))?;
        }

        builder.build()
    }

    pub fn kmer_len(&self) -> usize {
        self.kmer_len
    }

    pub fn get(&self, kmer: &str) -> Option<f64> {
        self.probs.get(kmer).copied()
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}

#[derive(Default)]
struct TableBuilder {
    kmer_len: Option<usize>,
    probs: HashMap<String, f64>,
}

impl TableBuilder {
    fn insert(&mut self, kmer: &str, prob: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(format!(
                "Probability of {} must be between 0.0 and 1.0, got {}",
                kmer, prob
            ));
        }

        let len = kmer.chars().count();
        match self.kmer_len {
            None => self.kmer_len = Some(len),
            Some(expected) if expected != len => {
                return Err(format!(
                    "Inconsistent k-mer length: expected {}, found {} ({})",
                    expected, len, kmer
                ))
            }
            Some(_) => {}
        }

        if self.probs.insert(kmer.to_string(), prob).is_some() {
            return Err(format!("Duplicate k-mer entry: {}", kmer));
        }
        Ok(())
    }

    fn build(self) -> Result<PriorsTable> {
        let kmer_len = self.kmer_len.ok_or("No k-mers found")?;
        if kmer_len == 0 {
            return Err("K-mers must not be empty".into());
        }

        let unmatchable = self
            .probs
            .keys()
            .filter(|kmer| kmer.chars().any(|c| c.is_lowercase() || c == 'T'))
            .count();
        if unmatchable > 0 {
            log::warn!(
                "{} of {} k-mers contain lowercase letters or T and never match normalized sequences",
                unmatchable,
                self.probs.len()
            );
        }

        Ok(PriorsTable {
            kmer_len,
            probs: self.probs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn priors_from_reader() {
        let data = "\
ACG 0.25\n\
CGU\t0.5\n\
\n\
GUA 1\n";
        let table = PriorsTable::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.kmer_len(), 3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("ACG"), Some(0.25));
        assert_eq!(table.get("CGU"), Some(0.5));
        assert_eq!(table.get("GUA"), Some(1.0));
        assert_eq!(table.get("AAA"), None);
    }

    #[test]
    fn priors_from_reader_wrong_field_count() {
        let data = "ACG 0.25\nCGU\n";
        let result = PriorsTable::from_reader(Cursor::new(data));
        assert!(result.unwrap_err().contains("at line 2"));

        let data = "ACG 0.25 0.5\n";
        assert!(PriorsTable::from_reader(Cursor::new(data)).is_err());
    }

    #[test]
    fn priors_from_reader_non_numeric_probability() {
        let data = "ACG 0.25\nCGU high\n";
        let result = PriorsTable::from_reader(Cursor::new(data));
        assert!(result.unwrap_err().starts_with("Invalid probability at line 2"));
    }

    #[test]
    fn priors_from_reader_probability_out_of_range() {
        assert!(PriorsTable::from_reader(Cursor::new("ACG 1.5\n")).is_err());
        assert!(PriorsTable::from_reader(Cursor::new("ACG -0.1\n")).is_err());
        assert!(PriorsTable::from_reader(Cursor::new("ACG NaN\n")).is_err());
    }

    #[test]
    fn priors_from_reader_inconsistent_kmer_length() {
        let data = "ACG 0.25\nCG 0.5\n";
        let result = PriorsTable::from_reader(Cursor::new(data));
        assert_eq!(
            result,
            Err("Inconsistent k-mer length: expected 3, found 2 (CG) at line 2".to_string())
        );
    }

    #[test]
    fn priors_from_reader_duplicate_kmer() {
        let data = "ACG 0.25\nACG 0.5\n";
        let result = PriorsTable::from_reader(Cursor::new(data));
        assert_eq!(
            result,
            Err("Duplicate k-mer entry: ACG at line 2".to_string())
        );
    }

    #[test]
    fn priors_from_reader_empty_file() {
        let result = PriorsTable::from_reader(Cursor::new(""));
        assert_eq!(result, Err("No k-mers found".to_string()));
    }

    #[test]
    fn priors_from_path_names_the_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "AC 0.5").unwrap();
        writeln!(temp_file, "CG").unwrap();
        let error = PriorsTable::from_path(temp_file.path()).unwrap_err();
        assert!(error.starts_with("Priors file"));
        assert!(error.contains("at line 2"));
    }

    #[test]
    fn priors_from_pairs() {
        let table = PriorsTable::new([("AB".to_string(), 0.5)]).unwrap();
        assert_eq!(table.kmer_len(), 2);
        assert_eq!(table.get("AB"), Some(0.5));
        assert!(!table.is_empty());

        let mixed = PriorsTable::new([("AB".to_string(), 0.5), ("ABC".to_string(), 0.5)]);
        assert!(mixed.is_err());
        assert!(PriorsTable::new(Vec::<(String, f64)>::new()).is_err());
    }
}
