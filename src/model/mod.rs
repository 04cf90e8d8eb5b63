pub mod params;
pub mod preprocess;
pub mod priors;
pub mod setup;

pub use params::{ParamValues, ParameterGrid, ParameterSpace};
pub use preprocess::{preprocess, PreprocessedRecord, Priors, WeightConfig};
pub use priors::PriorsTable;
pub use setup::{ModelOptions, ModelSetup, SeqModel, VectorizerConfig};
