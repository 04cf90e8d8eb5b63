use crate::model::ModelOptions;
use crate::utils::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="rbpmodel",
          version=&**FULL_VERSION,
          about="Weighted sequence preprocessing for RNA-protein binding site models",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Convert annotated sequences into weighted sequences")]
    Preprocess(PreprocessArgs),
    #[clap(about = "Print the parameter space for model search")]
    Params(ParamsArgs),
    #[clap(about = "Sequence and priors validator")]
    Validate(ValidateArgs),
}

/// Options shared by every command that builds a sequence preprocessor.
#[derive(Args, Debug, Clone)]
pub struct WeightArgs {
    #[clap(help_heading("Weighting"))]
    #[clap(long = "viewpoint-weight")]
    #[clap(value_name = "WEIGHT")]
    #[clap(help = "Weight of viewpoint (uppercase) positions")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub viewpoint_weight: f64,

    #[clap(help_heading("Weighting"))]
    #[clap(long = "context-weight")]
    #[clap(value_name = "WEIGHT")]
    #[clap(help = "Weight of context (lowercase) positions")]
    #[clap(default_value = "0.0")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub context_weight: f64,

    #[clap(help_heading("Weighting"))]
    #[clap(long = "priors")]
    #[clap(value_name = "PRIORS")]
    #[clap(help = "File with k-mer cleavage probabilities (kmer probability)")]
    #[clap(requires = "priors_weight")]
    #[arg(value_parser = check_file_exists)]
    pub priors_path: Option<PathBuf>,

    #[clap(help_heading("Weighting"))]
    #[clap(long = "priors-weight")]
    #[clap(value_name = "WEIGHT")]
    #[clap(help = "Scaling factor of prior probabilities subtracted from position weights")]
    #[arg(value_parser = ensure_non_negative_float)]
    pub priors_weight: Option<f64>,
}

impl WeightArgs {
    pub fn to_options(&self) -> ModelOptions {
        ModelOptions {
            viewpoint_weight: self.viewpoint_weight,
            context_weight: self.context_weight,
            priors_path: self.priors_path.clone(),
            priors_weight: self.priors_weight,
        }
    }
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct PreprocessArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "FASTA file with viewpoint (uppercase) and context (lowercase) positions")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output TSV file (use - for stdout, .gz for compressed output)")]
    #[clap(value_name = "OUTPUT")]
    #[clap(default_value = "-")]
    #[arg(value_parser = check_output_path)]
    pub output_path: String,

    #[command(flatten)]
    pub weights: WeightArgs,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

#[derive(Parser, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub weights: WeightArgs,
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "FASTA file with viewpoint (uppercase) and context (lowercase) positions")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(long = "priors")]
    #[clap(value_name = "PRIORS")]
    #[clap(help = "File with k-mer cleavage probabilities (kmer probability)")]
    #[arg(value_parser = check_file_exists)]
    pub priors_path: Option<PathBuf>,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_output_path(s: &str) -> Result<String> {
    if s == "-" {
        return Ok(s.to_string());
    }
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_non_negative_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !value.is_finite() || value < 0.0 {
        Err(format!(
            "The value must be a non-negative number, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}
