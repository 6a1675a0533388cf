//! Structured analysis reports and their text/JSON renderings.

use crate::detector::{AnomalyKind, Detection, ProbeRecord};
use crate::verify::{Mismatch, Verification};
use crate::width::BitWidth;
use serde::{Deserialize, Serialize};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

/// Knobs for building an [`AnalysisReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Samples drawn for the verification section
    pub verify_samples: u32,
    /// Example cases listed at the end of the report
    pub example_count: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verify_samples: 20,
            example_count: 3,
        }
    }
}

impl ReportConfig {
    /// Create a new config with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of verification samples
    #[must_use]
    pub const fn with_verify_samples(mut self, samples: u32) -> Self {
        self.verify_samples = samples;
        self
    }

    /// Set the number of example cases
    #[must_use]
    pub const fn with_example_count(mut self, count: u32) -> Self {
        self.example_count = count;
        self
    }
}

/// A valid input → output bit route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Input bit index
    pub input_bit: u32,
    /// Output bit index
    pub output_bit: u32,
}

/// An input bit that failed detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidBit {
    /// Input bit index
    pub bit: u32,
    /// Single-bit probe input
    pub input: u64,
    /// Raw black-box output for the probe
    pub output: u64,
    /// Why the bit was rejected
    pub anomaly: AnomalyKind,
}

/// A sampled input with reconstructed and real outputs side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleCase {
    /// Sampled input
    pub input: u64,
    /// Output of the reconstructed mapping
    pub actual: u64,
    /// Output of the black box
    pub expected: u64,
}

impl ExampleCase {
    /// Check if the reconstruction agreed with the black box
    #[must_use]
    pub const fn matches(&self) -> bool {
        self.actual == self.expected
    }
}

/// Verification outcome as shown in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Samples drawn
    pub samples: u32,
    /// True iff no sample mismatched
    pub passed: bool,
    /// Mismatching samples
    pub mismatches: Vec<Mismatch>,
}

impl From<Verification> for VerificationSummary {
    fn from(verification: Verification) -> Self {
        Self {
            samples: verification.samples,
            passed: verification.passed(),
            mismatches: verification.mismatches,
        }
    }
}

/// Everything a presentation layer needs about one analysed black box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Bit width analysed
    pub width: BitWidth,
    /// Valid routes, ascending by input bit
    pub valid_mappings: Vec<MappingEntry>,
    /// Rejected input bits, ascending
    pub invalid_bits: Vec<InvalidBit>,
    /// Conflicting probes in detection order
    pub conflicts: Vec<ProbeRecord>,
    /// Output bits not reached by any valid route
    pub uncovered_outputs: Vec<u32>,
    /// Sampled verification of the valid routes
    pub verification: VerificationSummary,
    /// Example cases
    pub examples: Vec<ExampleCase>,
}

impl AnalysisReport {
    /// Assemble a report from a detection and its verification data
    #[must_use]
    pub fn new(
        detection: &Detection,
        verification: Verification,
        examples: Vec<ExampleCase>,
    ) -> Self {
        let valid_mappings = detection
            .mapping()
            .iter()
            .zip(detection.valid_mappings())
            .zip(0u32..)
            .filter(|((_, &valid), _)| valid)
            .filter_map(|((mapping, _), input_bit)| {
                mapping.output_bit().map(|output_bit| MappingEntry {
                    input_bit,
                    output_bit,
                })
            })
            .collect();

        let invalid_bits = detection
            .anomalies()
            .iter()
            .map(|a| InvalidBit {
                bit: a.bit,
                input: a.probe.input,
                output: a.probe.output,
                anomaly: a.kind,
            })
            .collect();

        Self {
            width: detection.width(),
            valid_mappings,
            invalid_bits,
            conflicts: detection.conflict_cases().to_vec(),
            uncovered_outputs: detection.uncovered_outputs().to_vec(),
            verification: verification.into(),
            examples,
        }
    }

    /// Check if every bit is validly mapped and every output covered
    #[must_use]
    pub fn is_full_permutation(&self) -> bool {
        self.invalid_bits.is_empty() && self.uncovered_outputs.is_empty()
    }

    /// Check if the sampled verification passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.verification.passed
    }

    /// Render a value as `0x.. (binary)` using this report's width
    #[must_use]
    pub fn format_value(&self, value: u64) -> String {
        format_value(self.width, value)
    }
}

fn format_value(width: BitWidth, value: u64) -> String {
    format!("0x{value:x} ({})", width.to_binary(value))
}

/// Render a report as human-readable text
#[must_use]
pub fn render_analysis_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("BIT MAPPING ANALYSIS: {}\n", report.width));
    output.push_str(RULE);

    output.push_str("\nValid mappings (input bit -> output bit):\n");
    if report.valid_mappings.is_empty() {
        output.push_str("  No valid bit mapping found\n");
    }
    for entry in &report.valid_mappings {
        output.push_str(&format!(
            "  bit {} -> {}\n",
            entry.input_bit, entry.output_bit
        ));
    }

    output.push_str("\nInvalid bits:\n");
    if report.invalid_bits.is_empty() {
        output.push_str("  All bit mappings are valid\n");
    }
    for invalid in &report.invalid_bits {
        output.push_str(&format!(
            "  bit {}: input=0x{:x} -> output={} [{}]\n",
            invalid.bit,
            invalid.input,
            report.format_value(invalid.output),
            invalid.anomaly
        ));
    }

    if !report.conflicts.is_empty() {
        output.push_str("\nConflicting probes:\n");
        for conflict in &report.conflicts {
            output.push_str(&format!(
                "  input={} -> output={}\n",
                report.format_value(conflict.input),
                report.format_value(conflict.output)
            ));
        }
    }

    if !report.uncovered_outputs.is_empty() {
        let bits: Vec<String> = report
            .uncovered_outputs
            .iter()
            .map(ToString::to_string)
            .collect();
        output.push_str(&format!("\nUncovered output bits: {}\n", bits.join(", ")));
    }

    let verification = &report.verification;
    output.push_str("\nVerification (valid bits only):\n");
    if verification.passed {
        output.push_str(&format!("  ✓ PASSED ({} samples)\n", verification.samples));
    } else {
        output.push_str(&format!(
            "  ✗ FAILED ({} of {} samples mismatched)\n",
            verification.mismatches.len(),
            verification.samples
        ));
        for mismatch in &verification.mismatches {
            output.push_str(&format!(
                "    input={} expected={} actual={}\n",
                report.format_value(mismatch.input),
                report.format_value(mismatch.expected),
                report.format_value(mismatch.actual)
            ));
        }
    }

    if !report.examples.is_empty() {
        output.push_str("\nExamples:\n");
        for example in &report.examples {
            output.push_str(&format!(
                "  input: {} -> output: {} expected: {} {}\n",
                report.format_value(example.input),
                report.format_value(example.actual),
                report.format_value(example.expected),
                if example.matches() { "✓" } else { "✗" }
            ));
        }
    }

    output.push('\n');
    output.push_str(RULE);
    output.push_str(&format!(
        "Summary: {} of {} bits mapped, {} invalid, {} conflicts, {} uncovered\n",
        report.valid_mappings.len(),
        report.width.bits(),
        report.invalid_bits.len(),
        report.conflicts.len(),
        report.uncovered_outputs.len()
    ));

    output
}

/// Render a report as pretty-printed JSON
pub fn render_analysis_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::detector::BitMoveDetector;
    use crate::sampler::{Seed, Xorshift64};

    fn mixed(x: u64) -> u64 {
        let mut result = 0;
        if x & 1 != 0 {
            result |= 4;
        }
        if x & 2 != 0 {
            result |= 8;
        }
        if x & 4 != 0 {
            result |= 16;
        }
        if x & 8 != 0 {
            result |= 16;
        }
        if x & 16 != 0 {
            result |= 1 | 32;
        }
        if x & 32 != 0 {
            result |= 2;
        }
        result & 0x3F
    }

    fn report_for<F: Fn(u64) -> u64>(f: F, bits: u32, config: &ReportConfig) -> AnalysisReport {
        let mut rng = Xorshift64::new(Seed::from_u64(2024));
        BitMoveDetector::quick_detect(f, bits, config, &mut rng).unwrap()
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = ReportConfig::default();
            assert_eq!(config.verify_samples, 20);
            assert_eq!(config.example_count, 3);
        }

        #[test]
        fn test_builder() {
            let config = ReportConfig::new()
                .with_verify_samples(50)
                .with_example_count(0);
            assert_eq!(config.verify_samples, 50);
            assert_eq!(config.example_count, 0);
        }
    }

    mod build_tests {
        use super::*;

        #[test]
        fn test_mixed_report_contents() {
            let report = report_for(mixed, 6, &ReportConfig::default());

            assert_eq!(
                report.valid_mappings,
                vec![
                    MappingEntry {
                        input_bit: 0,
                        output_bit: 2
                    },
                    MappingEntry {
                        input_bit: 1,
                        output_bit: 3
                    },
                    MappingEntry {
                        input_bit: 2,
                        output_bit: 4
                    },
                    MappingEntry {
                        input_bit: 5,
                        output_bit: 1
                    },
                ]
            );
            let invalid: Vec<u32> = report.invalid_bits.iter().map(|b| b.bit).collect();
            assert_eq!(invalid, vec![3, 4]);
            assert_eq!(report.invalid_bits[1].output, 0x21);
            assert_eq!(
                report.conflicts,
                vec![
                    ProbeRecord::new(0x08, 0x10),
                    ProbeRecord::new(0x04, 0x10),
                    ProbeRecord::new(0x10, 0x21),
                ]
            );
            assert_eq!(report.uncovered_outputs, vec![0, 5]);
            assert_eq!(report.examples.len(), 3);
            assert_eq!(report.verification.samples, 20);
            assert!(!report.is_full_permutation());
        }

        #[test]
        fn test_examples_are_consistent() {
            let report = report_for(mixed, 6, &ReportConfig::new().with_example_count(10));
            for example in &report.examples {
                assert_eq!(example.expected, mixed(example.input));
                assert!(example.input < 64);
            }
        }

        #[test]
        fn test_verification_summary_from() {
            let summary: VerificationSummary = Verification {
                samples: 4,
                mismatches: vec![Mismatch {
                    input: 1,
                    expected: 2,
                    actual: 0,
                }],
            }
            .into();
            assert!(!summary.passed);
            assert_eq!(summary.samples, 4);
        }

        #[test]
        fn test_example_matches() {
            let hit = ExampleCase {
                input: 1,
                actual: 2,
                expected: 2,
            };
            let miss = ExampleCase {
                input: 1,
                actual: 0,
                expected: 2,
            };
            assert!(hit.matches());
            assert!(!miss.matches());
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_render_full_permutation() {
            let reverse5 = |x: u64| (x.reverse_bits() >> 59) & 0x1F;
            let report = report_for(reverse5, 5, &ReportConfig::default());
            let text = render_analysis_report(&report);

            assert!(text.contains("BIT MAPPING ANALYSIS: 5 bits"));
            assert!(text.contains("bit 0 -> 4"));
            assert!(text.contains("All bit mappings are valid"));
            assert!(text.contains("✓ PASSED (20 samples)"));
            assert!(!text.contains("Conflicting probes"));
            assert!(text.contains("Summary: 5 of 5 bits mapped"));
        }

        #[test]
        fn test_render_invalid_bits() {
            let report = report_for(mixed, 6, &ReportConfig::default());
            let text = render_analysis_report(&report);

            assert!(text.contains(
                "bit 4: input=0x10 -> output=0x21 (100001) [fans out to 2 output bits]"
            ));
            assert!(text.contains("collides with bit 2 on output bit 4"));
            assert!(text.contains("Conflicting probes:"));
            assert!(text.contains("input=0x8 (001000) -> output=0x10 (010000)"));
            assert!(text.contains("Uncovered output bits: 0, 5"));
        }

        #[test]
        fn test_render_no_valid_mappings() {
            let report = report_for(|_x: u64| 0u64, 3, &ReportConfig::default());
            let text = render_analysis_report(&report);
            assert!(text.contains("No valid bit mapping found"));
            assert!(text.contains("absorbed"));
        }

        #[test]
        fn test_render_failed_verification() {
            // Bits 0 and 1 both land on output bit 0
            let collide = |x: u64| (if x & 0b11 != 0 { 0b01 } else { 0 }) | (x & 0b100);
            let report = report_for(collide, 3, &ReportConfig::new().with_verify_samples(200));
            let text = render_analysis_report(&report);
            assert!(!report.passed());
            assert!(text.contains("✗ FAILED"));
            assert!(text.contains("expected="));
        }

        #[test]
        fn test_render_json() {
            let report = report_for(mixed, 6, &ReportConfig::default());
            let json = render_analysis_json(&report).unwrap();
            assert!(json.contains("\"valid_mappings\""));
            assert!(json.contains("\"fan_out\""));

            let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, report);
        }

        #[test]
        fn test_format_value() {
            let width = BitWidth::new(6).unwrap();
            assert_eq!(format_value(width, 0x21), "0x21 (100001)");
        }
    }
}
