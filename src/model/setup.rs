use super::params::{ParamValues, ParameterGrid, ParameterSpace};
use super::preprocess::{Priors, WeightConfig};
use super::priors::PriorsTable;
use crate::utils::{read_fasta, FastaRecords, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// User-facing options of a sequence model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    pub viewpoint_weight: f64,
    pub context_weight: f64,
    pub priors_path: Option<PathBuf>,
    pub priors_weight: Option<f64>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            viewpoint_weight: 1.0,
            context_weight: 0.0,
            priors_path: None,
            priors_weight: None,
        }
    }
}

/// Graph kernel settings passed to the external vectorizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    pub complexity: u32,
    pub r: u32,
    pub d: u32,
    pub min_r: u32,
    pub min_d: u32,
    pub nbits: u32,
    pub normalization: bool,
    pub inner_normalization: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            complexity: 3,
            r: 3,
            d: 3,
            min_r: 0,
            min_d: 0,
            nbits: 16,
            normalization: true,
            inner_normalization: true,
        }
    }
}

impl VectorizerConfig {
    /// Single-candidate grid holding the current settings.
    pub fn to_grid(&self) -> ParameterGrid {
        let int = |v: u32| ParamValues::Int(vec![i64::from(v)]);
        ParameterGrid::new()
            .with("complexity", int(self.complexity))
            .with("r", int(self.r))
            .with("d", int(self.d))
            .with("min_r", int(self.min_r))
            .with("min_d", int(self.min_d))
            .with("nbits", int(self.nbits))
            .with("normalization", ParamValues::Bool(vec![self.normalization]))
            .with(
                "inner_normalization",
                ParamValues::Bool(vec![self.inner_normalization]),
            )
    }
}

impl fmt::Display for VectorizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.to_grid().iter() {
            writeln!(f, "vectorizer_default\t{}\t{}", name, values)?;
        }
        Ok(())
    }
}

/// Hooks a training driver needs from a model type.
pub trait ModelSetup {
    fn load_data(&self, path: &Path) -> Result<FastaRecords>;
    fn build_preprocessor(&self, options: &ModelOptions) -> Result<WeightConfig>;
    fn build_vectorizer(&self, options: &ModelOptions) -> VectorizerConfig;
    fn declare_parameters(&self, options: &ModelOptions) -> ParameterSpace;
}

/// Models trained on case-annotated RNA sequences.
#[derive(Debug, Clone, Default)]
pub struct SeqModel {
    vectorizer: VectorizerConfig,
}

impl SeqModel {
    pub fn new(vectorizer: VectorizerConfig) -> Self {
        Self { vectorizer }
    }
}

impl ModelSetup for SeqModel {
    fn load_data(&self, path: &Path) -> Result<FastaRecords> {
        read_fasta(path)
    }

    fn build_preprocessor(&self, options: &ModelOptions) -> Result<WeightConfig> {
        let priors = match &options.priors_path {
            None => None,
            Some(path) => {
                let weight = options
                    .priors_weight
                    .ok_or_else(|| format!("No priors weight given for priors {}", path.display()))?;
                let table = PriorsTable::from_path(path)?;
                log::info!(
                    "Loaded {} {}-mer priors from {}",
                    table.len(),
                    table.kmer_len(),
                    path.display()
                );
                Some(Priors::new(Arc::new(table), weight)?)
            }
        };
        WeightConfig::new(options.viewpoint_weight, options.context_weight, priors)
    }

    // Weights only shape the preprocessor; the kernel settings are per model.
    fn build_vectorizer(&self, _options: &ModelOptions) -> VectorizerConfig {
        self.vectorizer.clone()
    }

    fn declare_parameters(&self, options: &ModelOptions) -> ParameterSpace {
        let mut preprocessor = ParameterGrid::new()
            .with(
                "viewpoint_weight",
                ParamValues::Float(vec![options.viewpoint_weight]),
            )
            .with(
                "context_weight",
                ParamValues::Float(vec![options.context_weight]),
            );
        if let (Some(_), Some(weight)) = (&options.priors_path, options.priors_weight) {
            preprocessor = preprocessor.with("priors_weight", ParamValues::Float(vec![weight]));
        }

        let vectorizer = ParameterGrid::new()
            .with("complexity", ParamValues::Int(vec![2, 3]))
            .with("r", ParamValues::Int((1..=5).collect()))
            .with("d", ParamValues::Int((1..=5).collect()))
            .with("min_r", ParamValues::Int(vec![0, 1]))
            .with("min_d", ParamValues::Int(vec![0, 1]))
            .with("nbits", ParamValues::Int(vec![14, 16, 18]))
            .with("normalization", ParamValues::Bool(vec![true]))
            .with("inner_normalization", ParamValues::Bool(vec![true]));

        let estimator = ParameterGrid::new()
            .with(
                "loss",
                text(&["hinge", "log_loss", "modified_huber", "squared_hinge", "perceptron"]),
            )
            .with("penalty", text(&["l1", "l2", "elasticnet"]))
            .with(
                "alpha",
                ParamValues::Float((-8..0).map(|x| 10f64.powi(x)).collect()),
            )
            .with(
                "l1_ratio",
                ParamValues::Float(vec![0.0, 0.15, 0.5, 0.85, 1.0]),
            )
            .with(
                "eta0",
                ParamValues::Float((-4..-1).map(|x| 10f64.powi(x)).collect()),
            )
            .with("learning_rate", text(&["optimal", "constant", "invscaling"]))
            .with("class_weight", text(&["balanced", "none"]))
            .with("average", ParamValues::Bool(vec![true, false]));

        ParameterSpace {
            preprocessor,
            vectorizer,
            estimator,
        }
    }
}

fn text(values: &[&str]) -> ParamValues {
    ParamValues::Text(values.iter().map(|v| v.to_string()).collect())
}
