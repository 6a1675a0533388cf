//! Demo command handler

use crate::commands::{DemoArgs, ReportFormat};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::handlers::probe::print_report;
use crate::output::Reporter;
use bitperm::{subjects, AnalysisReport, BitMoveDetector, ReportConfig, Seed, Xorshift64};
use serde::{Deserialize, Serialize};

/// One analysed walkthrough scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoResult {
    /// Subject name
    pub name: String,
    /// Subject description
    pub description: String,
    /// Analysis of the subject at its intended width
    pub report: AnalysisReport,
}

/// Analyse every walkthrough scenario with one shared sample stream
pub fn run_demo(seed: Seed) -> CliResult<Vec<DemoResult>> {
    let mut rng = Xorshift64::new(seed);
    let config = ReportConfig::default();

    subjects::demo_scenarios()
        .iter()
        .map(|subject| -> CliResult<DemoResult> {
            let report =
                BitMoveDetector::quick_detect(*subject, subject.width, &config, &mut rng)?;
            Ok(DemoResult {
                name: subject.name.to_string(),
                description: subject.description.to_string(),
                report,
            })
        })
        .collect()
}

/// Execute the demo command
pub fn execute_demo(config: &CliConfig, args: &DemoArgs) -> CliResult<()> {
    let results = run_demo(Seed::from_u64(args.seed))?;
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match args.format {
        ReportFormat::Text => {
            for (index, result) in results.iter().enumerate() {
                let title = format!(
                    "Scenario {}: {} ({})",
                    index + 1,
                    result.name,
                    result.description
                );
                print_report(&reporter, &title, &result.report, ReportFormat::Text)?;
            }
        }
        ReportFormat::Json => reporter.raw(&serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}
