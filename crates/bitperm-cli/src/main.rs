//! Bitperm CLI: probe black-box functions for per-bit permutations
//!
//! ## Usage
//!
//! ```bash
//! bitperm subjects                              # List built-in subjects
//! bitperm probe --subject mixed                 # Analyse a subject
//! bitperm probe --table outputs.json --strict   # Analyse a replay table
//! bitperm demo --format json                    # Walkthrough scenarios as JSON
//! ```

use bitperm_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    config.init_logging();

    match cli.command {
        Commands::Probe(args) => handlers::execute_probe(&config, &args),
        Commands::Demo(args) => handlers::execute_demo(&config, &args),
        Commands::Subjects => {
            handlers::execute_subjects(&config);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_build_config_default() {
        let config = build_config(&parse(&["bitperm", "subjects"]));
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.color, ColorChoice::Auto);
    }

    #[test]
    fn test_build_config_verbose() {
        let config = build_config(&parse(&["bitperm", "-v", "subjects"]));
        assert_eq!(config.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_build_config_debug() {
        let config = build_config(&parse(&["bitperm", "-vvv", "subjects"]));
        assert_eq!(config.verbosity, Verbosity::Debug);
    }

    #[test]
    fn test_build_config_quiet() {
        let config = build_config(&parse(&["bitperm", "-q", "-v", "subjects"]));
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_build_config_color_never() {
        let config = build_config(&parse(&["bitperm", "--color", "never", "subjects"]));
        assert_eq!(config.color, ColorChoice::Never);
    }
}
