//! Defines the `RecordWriter` struct for writing weighted sequences as TSV.
//!
//! Every line holds `id`, `sequence` and the comma-separated weights.
//! File output goes to a temporary sibling and only replaces `output_path`
//! once [`RecordWriter::finish`] succeeds.

use super::readers::is_gzipped;
use super::Result;
use crate::model::PreprocessedRecord;
use flate2::{write::GzEncoder, Compression};
use itertools::Itertools;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

enum Sink {
    Stdout(BufWriter<io::Stdout>),
    Plain(BufWriter<NamedTempFile>),
    Gzip(GzEncoder<BufWriter<NamedTempFile>>),
}

impl Sink {
    fn as_write(&mut self) -> &mut dyn Write {
        match self {
            Sink::Stdout(w) => w,
            Sink::Plain(w) => w,
            Sink::Gzip(w) => w,
        }
    }
}

pub struct RecordWriter {
    sink: Sink,
    path: String,
    num_written: usize,
    num_nonzero_weights: usize,
}

impl RecordWriter {
    /// Opens `output_path` for writing; `-` selects stdout and a `.gz` or
    /// `.gzip` suffix selects gzip compression.
    ///
    /// Dropping the writer without calling `finish` discards file output.
    pub fn new(output_path: &str) -> Result<RecordWriter> {
        let sink = if output_path == "-" {
            Sink::Stdout(BufWriter::new(io::stdout()))
        } else {
            let path = Path::new(output_path);
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file = tempfile::Builder::new()
                .prefix(".rbpmodel")
                .suffix(".tmp")
                .tempfile_in(dir)
                .map_err(|e| format!("Failed to create {}: {}", output_path, e))?;
            if is_gzipped(path) {
                Sink::Gzip(GzEncoder::new(BufWriter::new(file), Compression::default()))
            } else {
                Sink::Plain(BufWriter::new(file))
            }
        };
        Ok(RecordWriter {
            sink,
            path: output_path.to_string(),
            num_written: 0,
            num_nonzero_weights: 0,
        })
    }

    pub fn write(&mut self, record: &PreprocessedRecord) -> Result<()> {
        let weights = record.weights.iter().join(",");
        writeln!(
            self.sink.as_write(),
            "{}\t{}\t{}",
            record.id,
            record.sequence,
            weights
        )
        .map_err(|e| format!("Failed to write record {} to {}: {}", record.id, self.path, e))?;
        self.num_written += 1;
        self.num_nonzero_weights += record.weights.iter().filter(|w| **w != 0.0).count();
        Ok(())
    }

    pub fn num_written(&self) -> usize {
        self.num_written
    }

    /// Number of written positions with a weight other than 0.
    pub fn num_nonzero_weights(&self) -> usize {
        self.num_nonzero_weights
    }

    /// Flushes buffered output, completes the gzip stream if any and moves
    /// the finished file onto the output path.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        let error = |e: io::Error| format!("Failed to finalize {}: {}", path, e);
        let file = match self.sink {
            Sink::Stdout(mut w) => return w.flush().map_err(error),
            Sink::Plain(w) => w.into_inner().map_err(|e| error(e.into_error()))?,
            Sink::Gzip(w) => w
                .finish()
                .map_err(error)?
                .into_inner()
                .map_err(|e| error(e.into_error()))?,
        };
        file.persist(&path).map_err(|e| error(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::MultiGzDecoder;
    use std::fs::File;
    use std::io::Read;

    fn record(id: &str, sequence: &str, weights: Vec<f64>) -> PreprocessedRecord {
        PreprocessedRecord {
            id: id.to_string(),
            sequence: sequence.to_string(),
            weights,
        }
    }

    #[test]
    fn writes_tab_separated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let path = path.to_str().unwrap();

        let mut writer = RecordWriter::new(path).unwrap();
        writer
            .write(&record("seq1", "ACGU", vec![0.0, 0.5, 1.0, 1.0]))
            .unwrap();
        writer.write(&record("empty", "", vec![])).unwrap();
        assert_eq!(writer.num_written(), 2);
        assert_eq!(writer.num_nonzero_weights(), 3);
        writer.finish().unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "seq1\tACGU\t0,0.5,1,1\nempty\t\t\n");
    }

    #[test]
    fn writes_gzip_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv.gz");
        let path = path.to_str().unwrap();

        let mut writer = RecordWriter::new(path).unwrap();
        writer.write(&record("s", "AU", vec![1.0, 0.25])).unwrap();
        writer.finish().unwrap();

        let mut decoded = String::new();
        MultiGzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "s\tAU\t1,0.25\n");
    }

    #[test]
    fn gzip_suffix_matches_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv.GZIP");
        let path = path.to_str().unwrap();

        let mut writer = RecordWriter::new(path).unwrap();
        writer.write(&record("s", "AU", vec![0.0, 0.0])).unwrap();
        assert_eq!(writer.num_nonzero_weights(), 0);
        writer.finish().unwrap();

        let mut decoded = String::new();
        crate::utils::open_text_reader(Path::new(path))
            .unwrap()
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "s\tAU\t0,0\n");
    }

    #[test]
    fn output_appears_only_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        let mut writer = RecordWriter::new(path.to_str().unwrap()).unwrap();
        writer.write(&record("s", "AU", vec![1.0, 1.0])).unwrap();
        assert!(!path.exists());
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "s\tAU\t1,1\n");

        let mut writer = RecordWriter::new(path.to_str().unwrap()).unwrap();
        writer.write(&record("t", "GG", vec![0.0, 1.0])).unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "s\tAU\t1,1\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
