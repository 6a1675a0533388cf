//! Bitperm CLI Library
//!
//! Command-line front end for the Bitperm bit-permutation detector: probes
//! built-in subjects or JSON replay tables and prints text or JSON reports.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)] // String building is clear and correct
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, DemoArgs, ProbeArgs, ReportFormat, SourceArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
