//! Probe command handler

use crate::commands::{ProbeArgs, ReportFormat, SourceArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use bitperm::{
    render_analysis_json, render_analysis_report, subjects, AnalysisReport, BitMoveDetector,
    BlackBox, ReportConfig, Seed, Subject, TableOracle, Xorshift64,
};

/// Black box selected on the command line
#[derive(Debug, Clone)]
pub enum ProbeSource {
    /// Built-in subject
    Subject(Subject),
    /// Replay table loaded from JSON
    Table(TableOracle),
}

impl ProbeSource {
    /// Width the source is meant to be probed at
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Subject(subject) => subject.width,
            Self::Table(table) => table.width().bits(),
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Subject(subject) => format!("subject {}", subject.name),
            Self::Table(table) => format!("replay table ({})", table.width()),
        }
    }
}

impl BlackBox for ProbeSource {
    fn eval(&self, input: u64) -> u64 {
        match self {
            Self::Subject(subject) => subject.eval(input),
            Self::Table(table) => table.eval(input),
        }
    }
}

/// Turn `--subject` / `--table` into a probe source
pub fn resolve_source(args: &SourceArgs) -> CliResult<ProbeSource> {
    if let Some(ref name) = args.subject {
        return subjects::lookup(name)
            .map(|subject| ProbeSource::Subject(*subject))
            .ok_or_else(|| {
                CliError::invalid_argument(format!(
                    "unknown subject '{name}'; run `bitperm subjects` for the list"
                ))
            });
    }
    if let Some(ref path) = args.table {
        return Ok(ProbeSource::Table(TableOracle::load(path)?));
    }
    Err(CliError::invalid_argument(
        "either --subject or --table is required",
    ))
}

/// Execute the probe command
pub fn execute_probe(config: &CliConfig, args: &ProbeArgs) -> CliResult<()> {
    let source = resolve_source(&args.source)?;
    let width = args.width.unwrap_or_else(|| source.width());
    if let ProbeSource::Table(ref table) = source {
        if width > table.width().bits() {
            return Err(CliError::invalid_argument(format!(
                "--width {width} exceeds the replay table's {}",
                table.width()
            )));
        }
    }
    let title = format!("{} at {width} bits", source.label());
    tracing::info!(source = %source.label(), width, seed = args.seed, "probing");

    let report_config = ReportConfig::new()
        .with_verify_samples(args.samples)
        .with_example_count(args.examples);
    let mut rng = Xorshift64::new(Seed::from_u64(args.seed));
    let report = BitMoveDetector::quick_detect(source, width, &report_config, &mut rng)?;

    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    print_report(&reporter, &title, &report, args.format)?;

    if args.strict && !report.passed() {
        return Err(CliError::VerificationFailed {
            mismatches: report.verification.mismatches.len(),
            samples: report.verification.samples,
        });
    }
    Ok(())
}

/// Print one report in the requested format
pub fn print_report(
    reporter: &Reporter,
    title: &str,
    report: &AnalysisReport,
    format: ReportFormat,
) -> CliResult<()> {
    match format {
        ReportFormat::Text => {
            reporter.header(title);
            reporter.block(&render_analysis_report(report));
            if report.passed() {
                reporter.success("reconstruction matches the black box on all samples");
            } else {
                reporter.failure("reconstruction disagrees with the black box");
            }
        }
        ReportFormat::Json => reporter.raw(&render_analysis_json(report)?),
    }
    Ok(())
}
