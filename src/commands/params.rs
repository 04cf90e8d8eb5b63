use crate::cli::ParamsArgs;
use crate::model::{ModelSetup, SeqModel};
use crate::utils::Result;
use std::io::{self, Write};

pub fn params(args: ParamsArgs) -> Result<()> {
    let model = SeqModel::default();
    let options = args.weights.to_options();

    // Only declare a space for a configuration that can actually be built
    model.build_preprocessor(&options)?;
    let vectorizer = model.build_vectorizer(&options);
    let space = model.declare_parameters(&options);
    log::info!(
        "Parameter space: preprocessor={}, vectorizer={}, estimator={}, combinations={}",
        space.preprocessor.len(),
        space.vectorizer.len(),
        space.estimator.len(),
        space.size()
    );

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}{}", vectorizer, space)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("Failed to write parameter space: {}", e))
}
