mod readers;
mod stats;
mod writers;

pub use readers::{open_text_reader, read_fasta, FastaRecords, SequenceRecord};
pub use stats::{calculate_stats, Stats};
pub use writers::RecordWriter;

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
