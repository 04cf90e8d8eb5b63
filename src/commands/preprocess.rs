use crate::cli::PreprocessArgs;
use crate::model::preprocess::preprocess as weigh_records;
use crate::model::{ModelSetup, PreprocessedRecord, SeqModel, WeightConfig};
use crate::utils::{FastaRecords, RecordWriter, Result};
use itertools::Itertools;
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use std::time;

const BATCH_SIZE: usize = 2048;

pub fn preprocess(args: PreprocessArgs) -> Result<()> {
    let start_timer = time::Instant::now();
    let model = SeqModel::default();

    let config = model.build_preprocessor(&args.weights.to_options())?;
    let records = model.load_data(&args.input_path)?;
    let mut writer = RecordWriter::new(&args.output_path)?;

    if args.num_threads == 1 {
        write_sequential(records, &config, &mut writer)?;
    } else {
        log::debug!(
            "Initializing thread pool with {} threads...",
            args.num_threads
        );
        let pool = initialize_thread_pool(args.num_threads)?;
        write_batched(records, &config, &mut writer, &pool)?;
    }

    let num_written = writer.num_written();
    if has_only_zero_weights(&writer) {
        log::warn!(
            "All weights written to {} are 0; check the viewpoint and priors weights",
            args.output_path
        );
    }
    writer.finish()?;
    log::info!(
        "Wrote {} weighted sequences to {}",
        num_written,
        args.output_path
    );
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

fn write_sequential(
    records: FastaRecords,
    config: &WeightConfig,
    writer: &mut RecordWriter,
) -> Result<()> {
    itertools::process_results(records, |records| {
        weigh_records(records, config).try_for_each(|record| writer.write(&record))
    })?
}

/// Processes records batch by batch on `pool`; output order equals input order.
fn write_batched(
    records: FastaRecords,
    config: &WeightConfig,
    writer: &mut RecordWriter,
    pool: &rayon::ThreadPool,
) -> Result<()> {
    let batches = records.chunks(BATCH_SIZE);
    for batch in &batches {
        let batch = batch.collect::<Result<Vec<_>>>()?;
        let processed: Vec<PreprocessedRecord> = pool.install(|| {
            batch
                .into_par_iter()
                .map(|record| config.apply(record))
                .collect()
        });
        log::debug!("Processed batch of {} records", processed.len());
        for record in &processed {
            writer.write(record)?;
        }
    }
    Ok(())
}

fn has_only_zero_weights(writer: &RecordWriter) -> bool {
    writer.num_written() > 0 && writer.num_nonzero_weights() == 0
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("rbpmodel-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
