//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bitperm: infer how a black-box function routes individual bits
#[derive(Parser, Debug)]
#[command(name = "bitperm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe a built-in subject or a replay table and report its bit mapping
    Probe(ProbeArgs),

    /// Run the three walkthrough scenarios (collision, mixed, reversal)
    Demo(DemoArgs),

    /// List built-in subjects
    Subjects,
}

/// Which black box to probe
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Built-in subject name (see `bitperm subjects`)
    #[arg(short, long)]
    pub subject: Option<String>,

    /// JSON replay table: {"width": N, "outputs": [...]}
    #[arg(short, long)]
    pub table: Option<PathBuf>,
}

/// Arguments for the probe command
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Black box to probe
    #[command(flatten)]
    pub source: SourceArgs,

    /// Bit width (defaults to the subject's or table's width)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Verification samples
    #[arg(long, default_value = "20")]
    pub samples: u32,

    /// Example cases to include
    #[arg(long, default_value = "3")]
    pub examples: u32,

    /// Seed for sampling
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,

    /// Exit with failure when verification finds a mismatch
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the demo command
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Seed for sampling
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
