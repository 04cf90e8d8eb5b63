use super::Result;
use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

/// A FASTA record whose letter case is still intact.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

/// Lazy, single-pass stream of FASTA records.
///
/// Re-iterating a file means calling [`read_fasta`] again.
pub type FastaRecords = Box<dyn Iterator<Item = Result<SequenceRecord>> + Send>;

pub(super) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

pub fn open_text_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead + Send>>> {
    let file = File::open(path).map_err(|e| format!("File {}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

pub fn read_fasta(path: &Path) -> Result<FastaRecords> {
    let reader = fasta::Reader::from_bufread(open_text_reader(path)?);
    let records = reader
        .records()
        .enumerate()
        .map(|(record_number, result)| -> Result<SequenceRecord> {
            let record = result
                .map_err(|e| format!("Error at FASTA record {}: {}", record_number + 1, e))?;
            let seq = String::from_utf8(record.seq().to_vec()).map_err(|e| {
                format!(
                    "Error at FASTA record {} ({}): {}",
                    record_number + 1,
                    record.id(),
                    e
                )
            })?;
            Ok(SequenceRecord {
                id: record.id().to_string(),
                seq,
            })
        });
    Ok(Box::new(records))
}
