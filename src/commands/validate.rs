use crate::cli::ValidateArgs;
use crate::model::preprocess::{centered_priors, normalize_sequence};
use crate::model::PriorsTable;
use crate::utils::{calculate_stats, read_fasta, Result, SequenceRecord};

#[derive(Debug, Default, PartialEq)]
struct Summary {
    success_count: usize,
    error_count: usize,
    seq_lengths: Vec<usize>,
    num_positions: usize,
    num_viewpoint: usize,
    num_with_prior: usize,
}

impl Summary {
    fn add(&mut self, record: &SequenceRecord, priors: Option<&PriorsTable>) {
        let len = record.seq.chars().count();
        self.seq_lengths.push(len);
        self.num_positions += len;
        self.num_viewpoint += record.seq.chars().filter(|c| c.is_uppercase()).count();
        if let Some(table) = priors {
            let normalized = normalize_sequence(&record.seq);
            self.num_with_prior += centered_priors(&normalized, table)
                .iter()
                .filter(|p| p.is_some())
                .count();
        }
        self.success_count += 1;
    }
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let priors = match &args.priors_path {
        Some(path) => {
            let table = PriorsTable::from_path(path)?;
            log::info!(
                "Priors valid: {} {}-mers in {}",
                table.len(),
                table.kmer_len(),
                path.display()
            );
            Some(table)
        }
        None => None,
    };

    let mut summary = Summary::default();
    for result in read_fasta(&args.input_path)? {
        match result {
            Ok(record) => summary.add(&record, priors.as_ref()),
            Err(e) => {
                log::error!("{}", e);
                summary.error_count += 1;
            }
        }
    }

    let length_stats = calculate_stats(&summary.seq_lengths);
    log::info!(
        "Sequence Lengths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
        length_stats.min,
        length_stats.max,
        length_stats.median,
        length_stats.mean,
        length_stats.std_dev
    );
    log::info!(
        "Viewpoint positions: {} of {} ({:.2}%)",
        summary.num_viewpoint,
        summary.num_positions,
        percentage(summary.num_viewpoint, summary.num_positions)
    );
    if priors.is_some() {
        log::info!(
            "Positions with prior: {} of {} ({:.2}%)",
            summary.num_with_prior,
            summary.num_positions,
            percentage(summary.num_with_prior, summary.num_positions)
        );
    }

    let total = summary.success_count + summary.error_count;
    match summary.error_count {
        0 => log::info!("Validation successful. Records pass={}", summary.success_count),
        _ => log::info!(
            "Validation failed. Records pass={} ({:.2}%), fail={} ({:.2}%)",
            summary.success_count,
            percentage(summary.success_count, total),
            summary.error_count,
            percentage(summary.error_count, total)
        ),
    }

    Ok(())
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
