use clap::{Args, Parser, Subcommand, ValueEnum};
use dccm::engine::config::Weighting;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "DCCM CLI - Dynamic cross-correlation analysis of molecular dynamics trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the dynamic cross-correlation matrix of a trajectory and write it as CSV.
    Compute(ComputeArgs),
    /// Summarize a structure or trajectory file and preview an atom selection.
    Inspect(InspectArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    // --- Inputs ---
    /// PDB file defining the topology. Its models are used as frames
    /// unless a separate trajectory is given.
    #[arg(required = true, value_name = "TOPOLOGY")]
    pub topology: PathBuf,

    /// Multi-model PDB trajectory with the same atoms as the topology.
    #[arg(value_name = "TRAJECTORY")]
    pub trajectory: Option<PathBuf>,

    /// Path for the correlation matrix CSV.
    #[arg(short, long, default_value = "dccm.csv", value_name = "PATH")]
    pub output: PathBuf,

    /// Also write the covariance matrix (Å²) to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub covariance: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selection Overrides ---
    /// Atoms to correlate (e.g., 'name CA', 'resid 10-80 and name CA').
    #[arg(short, long, value_name = "EXPR")]
    pub selection: Option<String>,

    /// Atoms used for the superposition fit. Defaults to --selection.
    #[arg(long, value_name = "EXPR")]
    pub fit_selection: Option<String>,

    // --- Frame Overrides ---
    /// First frame to analyze (0-based).
    #[arg(long, value_name = "INT")]
    pub start: Option<usize>,

    /// Stop before this frame (exclusive).
    #[arg(long, value_name = "INT")]
    pub stop: Option<usize>,

    /// Analyze every N-th frame.
    #[arg(long, value_name = "INT")]
    pub stride: Option<usize>,

    /// Frame every other frame is superimposed onto.
    #[arg(short = 'r', long, value_name = "INT")]
    pub reference_frame: Option<usize>,

    // --- Alignment Overrides ---
    /// Per-atom weights of the superposition fit.
    #[arg(long, value_enum, value_name = "SCHEME")]
    pub weighting: Option<WeightingArg>,

    /// Skip superposition and use raw coordinates.
    #[arg(long)]
    pub no_align: bool,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S frames.stride=10
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PDB file defining the topology.
    #[arg(required = true, value_name = "TOPOLOGY")]
    pub topology: PathBuf,

    /// Multi-model PDB trajectory with the same atoms as the topology.
    #[arg(value_name = "TRAJECTORY")]
    pub trajectory: Option<PathBuf>,

    /// Resolve this selection and list the matching atoms.
    #[arg(short, long, value_name = "EXPR")]
    pub selection: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingArg {
    /// Weight fitted atoms by atomic mass.
    Mass,
    /// Weight fitted atoms equally.
    Uniform,
}

impl From<WeightingArg> for Weighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Mass => Weighting::Mass,
            WeightingArg::Uniform => Weighting::Uniform,
        }
    }
}
