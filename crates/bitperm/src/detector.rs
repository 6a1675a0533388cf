//! Bit-mapping detector.
//!
//! Probes a black box with single-bit inputs to infer a per-bit permutation,
//! then reconstructs and statistically verifies it.
//!
//! # Probe order
//!
//! Input bits are probed in ascending order, exactly once each. When two input
//! bits land on the same output bit, the lower (first-seen) bit keeps the
//! mapping and every later claimant is marked invalid. Reports depend on this
//! tie-break, so the order is part of the contract.
//!
//! # Example
//!
//! ```
//! use bitperm::{BitMapping, BitMoveDetector, Seed, Xorshift64};
//!
//! let reverse5 = |x: u64| (x.reverse_bits() >> 59) & 0b11111;
//! let mut detector = BitMoveDetector::new(reverse5, 5).unwrap();
//! let detection = detector.detect();
//! assert_eq!(detection.mapping()[0], BitMapping::MapsTo(4));
//!
//! let mut rng = Xorshift64::new(Seed::from_u64(7));
//! assert!(detector.verify(100, &mut rng).unwrap());
//! ```

use crate::oracle::BlackBox;
use crate::report::{AnalysisReport, ExampleCase, ReportConfig};
use crate::result::{PermError, PermResult};
use crate::sampler::SampleSource;
use crate::verify::Verification;
use crate::width::BitWidth;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Where a single input bit ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitMapping {
    /// No trustworthy target was found
    #[default]
    Unmapped,
    /// Routed to this output bit
    MapsTo(u32),
}

impl BitMapping {
    /// Target output bit, if mapped
    #[must_use]
    pub const fn output_bit(self) -> Option<u32> {
        match self {
            Self::Unmapped => None,
            Self::MapsTo(bit) => Some(bit),
        }
    }

    /// Check if this entry is mapped
    #[must_use]
    pub const fn is_mapped(self) -> bool {
        matches!(self, Self::MapsTo(_))
    }
}

/// One probe of the black box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeRecord {
    /// Value passed to the black box
    pub input: u64,
    /// Value it returned
    pub output: u64,
}

impl ProbeRecord {
    /// Create a probe record
    #[must_use]
    pub const fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }
}

/// Why an input bit was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Output has bits set above the configured width
    OutOfRange,
    /// Output has more than one bit set
    FanOut {
        /// Number of output bits set
        set_bits: u32,
    },
    /// Output has no bit set; the input bit vanished
    Absorbed,
    /// Output bit was already claimed by a lower input bit
    Collision {
        /// Input bit that keeps the mapping
        claimed_by: u32,
        /// Contested output bit
        output_bit: u32,
    },
}

impl AnomalyKind {
    /// Short machine-friendly label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::FanOut { .. } => "fan_out",
            Self::Absorbed => "absorbed",
            Self::Collision { .. } => "collision",
        }
    }

    /// Whether the probe lands in the conflict record
    ///
    /// Out-of-range outputs are only flagged; every other anomaly is kept as
    /// a conflicting test vector.
    #[must_use]
    pub const fn records_conflict(&self) -> bool {
        !matches!(self, Self::OutOfRange)
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "output outside bit width"),
            Self::FanOut { set_bits } => write!(f, "fans out to {set_bits} output bits"),
            Self::Absorbed => write!(f, "absorbed (no output bit set)"),
            Self::Collision {
                claimed_by,
                output_bit,
            } => write!(
                f,
                "collides with bit {claimed_by} on output bit {output_bit}"
            ),
        }
    }
}

/// A rejected input bit together with its raw probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitAnomaly {
    /// Input bit index
    pub bit: u32,
    /// The single-bit probe that exposed the anomaly
    pub probe: ProbeRecord,
    /// Classification
    pub kind: AnomalyKind,
}

/// Outcome of one detection pass
///
/// Produced once by [`BitMoveDetector::detect`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    width: BitWidth,
    mapping: Vec<BitMapping>,
    valid: Vec<bool>,
    conflicts: Vec<ProbeRecord>,
    anomalies: Vec<BitAnomaly>,
    uncovered_outputs: Vec<u32>,
}

impl Detection {
    /// Bit width the detection ran with
    #[must_use]
    pub const fn width(&self) -> BitWidth {
        self.width
    }

    /// Mapping indexed by input bit
    #[must_use]
    pub fn mapping(&self) -> &[BitMapping] {
        &self.mapping
    }

    /// Validity flag per input bit
    #[must_use]
    pub fn valid_mappings(&self) -> &[bool] {
        &self.valid
    }

    /// Every rejected probe, in detection order
    #[must_use]
    pub fn conflict_cases(&self) -> &[ProbeRecord] {
        &self.conflicts
    }

    /// One entry per invalid input bit, ascending by bit
    #[must_use]
    pub fn anomalies(&self) -> &[BitAnomaly] {
        &self.anomalies
    }

    /// Output bits no accepted input bit maps to, ascending
    #[must_use]
    pub fn uncovered_outputs(&self) -> &[u32] {
        &self.uncovered_outputs
    }

    /// Anomaly recorded for `bit`, if it was rejected
    #[must_use]
    pub fn anomaly_for(&self, bit: u32) -> Option<&BitAnomaly> {
        self.anomalies.iter().find(|a| a.bit == bit)
    }

    /// Number of input bits with a valid mapping
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Check if every input bit mapped cleanly onto a distinct output bit
    #[must_use]
    pub fn is_full_permutation(&self) -> bool {
        self.anomalies.is_empty() && self.uncovered_outputs.is_empty()
    }

    /// Mask of input bits with a valid mapping
    #[must_use]
    pub fn valid_input_mask(&self) -> u64 {
        self.accepted().fold(0, |mask, (input, _)| mask | (1u64 << input))
    }

    /// Mask of output bits reached by a valid mapping
    #[must_use]
    pub fn covered_output_mask(&self) -> u64 {
        self.accepted().fold(0, |mask, (_, output)| mask | (1u64 << output))
    }

    /// Apply the accepted part of the mapping to `input`
    ///
    /// Input bits outside the width or without a valid mapping are dropped.
    #[must_use]
    pub fn transform(&self, input: u64) -> u64 {
        let input = input & self.width.mask();
        self.accepted()
            .filter(|&(bit, _)| input & (1u64 << bit) != 0)
            .fold(0, |result, (_, output)| result | (1u64 << output))
    }

    /// (input bit, output bit) pairs of valid mappings, ascending by input
    fn accepted(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.mapping
            .iter()
            .zip(&self.valid)
            .zip(0u32..)
            .filter_map(|((mapping, &valid), bit)| {
                if valid {
                    mapping.output_bit().map(|output| (bit, output))
                } else {
                    None
                }
            })
    }
}

/// Infers how a black box routes individual bits
pub struct BitMoveDetector<B> {
    black_box: B,
    width: BitWidth,
    detection: Option<Detection>,
}

impl<B> fmt::Debug for BitMoveDetector<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitMoveDetector")
            .field("width", &self.width)
            .field("detection", &self.detection)
            .finish_non_exhaustive()
    }
}

impl<B: BlackBox> BitMoveDetector<B> {
    /// Create a detector for a `bits`-wide domain
    ///
    /// No probing happens until [`detect`](Self::detect) is called.
    pub fn new(black_box: B, bits: u32) -> PermResult<Self> {
        let width = BitWidth::new(bits)?;
        Ok(Self {
            black_box,
            width,
            detection: None,
        })
    }

    /// Detect and build a full analysis report in one call
    pub fn quick_detect<R>(
        black_box: B,
        bits: u32,
        config: &ReportConfig,
        rng: &mut R,
    ) -> PermResult<AnalysisReport>
    where
        R: SampleSource + ?Sized,
    {
        let mut detector = Self::new(black_box, bits)?;
        detector.detect();
        detector.report(config, rng)
    }

    /// Probe every input bit and record the inferred mapping
    ///
    /// Running it again repeats the whole pass and replaces the previous
    /// result.
    pub fn detect(&mut self) -> &Detection {
        let detection = self.run_detection();
        self.detection.insert(detection)
    }

    fn run_detection(&self) -> Detection {
        let n = self.width.len();
        let mut mapping = vec![BitMapping::Unmapped; n];
        let mut valid = vec![false; n];
        let mut conflicts = Vec::new();
        let mut anomalies = Vec::new();
        // claimed[o] = lowest input bit mapped to output bit o
        let mut claimed: Vec<Option<u32>> = vec![None; n];

        for bit in 0..self.width.bits() {
            let probe = self.probe(bit);

            if !self.width.contains(probe.output) {
                warn!(
                    bit,
                    input = probe.input,
                    output = probe.output,
                    "probe output exceeds bit width"
                );
                anomalies.push(BitAnomaly {
                    bit,
                    probe,
                    kind: AnomalyKind::OutOfRange,
                });
                continue;
            }

            let set_bits = probe.output.count_ones();
            if set_bits != 1 {
                let kind = if set_bits == 0 {
                    AnomalyKind::Absorbed
                } else {
                    AnomalyKind::FanOut { set_bits }
                };
                warn!(
                    bit,
                    input = probe.input,
                    output = probe.output,
                    set_bits,
                    "probe did not map to a single output bit"
                );
                conflicts.push(probe);
                anomalies.push(BitAnomaly { bit, probe, kind });
                continue;
            }

            // In range with one bit set, so output_bit < n
            let output_bit = probe.output.trailing_zeros();
            if let Some(claimed_by) = claimed[output_bit as usize] {
                warn!(
                    bit,
                    claimed_by, output_bit, "input bits collide on the same output bit"
                );
                conflicts.push(probe);
                conflicts.push(self.probe(claimed_by));
                anomalies.push(BitAnomaly {
                    bit,
                    probe,
                    kind: AnomalyKind::Collision {
                        claimed_by,
                        output_bit,
                    },
                });
                continue;
            }

            claimed[output_bit as usize] = Some(bit);
            mapping[bit as usize] = BitMapping::MapsTo(output_bit);
            valid[bit as usize] = true;
            debug!(bit, output_bit, "bit mapped");
        }

        let uncovered_outputs: Vec<u32> = (0..self.width.bits())
            .filter(|&output| claimed[output as usize].is_none())
            .collect();
        for &output_bit in &uncovered_outputs {
            warn!(output_bit, "output bit not reached by any input bit");
        }

        info!(
            width = self.width.bits(),
            mapped = n - anomalies.len(),
            invalid = anomalies.len(),
            conflicts = conflicts.len(),
            uncovered = uncovered_outputs.len(),
            "bit mapping detection complete"
        );

        Detection {
            width: self.width,
            mapping,
            valid,
            conflicts,
            anomalies,
            uncovered_outputs,
        }
    }

    fn probe(&self, bit: u32) -> ProbeRecord {
        let input = 1u64 << bit;
        ProbeRecord::new(input, self.black_box.eval(input))
    }

    /// Configured bit width
    #[must_use]
    pub const fn width(&self) -> BitWidth {
        self.width
    }

    /// Check if `detect()` has run
    #[must_use]
    pub const fn is_detected(&self) -> bool {
        self.detection.is_some()
    }

    /// Result of the last detection
    pub fn detection(&self) -> PermResult<&Detection> {
        self.detection.as_ref().ok_or(PermError::NotDetectedYet)
    }

    /// Mapping indexed by input bit
    pub fn mapping(&self) -> PermResult<&[BitMapping]> {
        Ok(self.detection()?.mapping())
    }

    /// Validity flag per input bit
    pub fn valid_mappings(&self) -> PermResult<&[bool]> {
        Ok(self.detection()?.valid_mappings())
    }

    /// Rejected probes in detection order
    pub fn conflict_cases(&self) -> PermResult<&[ProbeRecord]> {
        Ok(self.detection()?.conflict_cases())
    }

    /// Rejected input bits with their classification
    pub fn anomalies(&self) -> PermResult<&[BitAnomaly]> {
        Ok(self.detection()?.anomalies())
    }

    /// Output bits never reached by a valid mapping
    pub fn uncovered_outputs(&self) -> PermResult<&[u32]> {
        Ok(self.detection()?.uncovered_outputs())
    }

    /// Apply the confirmed part of the mapping to `input`
    pub fn transform(&self, input: u64) -> PermResult<u64> {
        Ok(self.detection()?.transform(input))
    }

    /// Compare black box and reconstruction on `samples` random inputs
    ///
    /// Passing is probabilistic evidence only: interactions between bits that
    /// single-bit probes cannot see may go unsampled.
    pub fn verify<R>(&self, samples: u32, rng: &mut R) -> PermResult<bool>
    where
        R: SampleSource + ?Sized,
    {
        Ok(self.verify_detailed(samples, rng)?.passed())
    }

    /// Like [`verify`](Self::verify), keeping every mismatching sample
    pub fn verify_detailed<R>(&self, samples: u32, rng: &mut R) -> PermResult<Verification>
    where
        R: SampleSource + ?Sized,
    {
        Ok(Verification::run(
            self.detection()?,
            &self.black_box,
            samples,
            rng,
        ))
    }

    /// Build the structured analysis report
    ///
    /// Runs a verification over `config.verify_samples` samples and draws
    /// `config.example_count` example cases from `rng`.
    pub fn report<R>(&self, config: &ReportConfig, rng: &mut R) -> PermResult<AnalysisReport>
    where
        R: SampleSource + ?Sized,
    {
        let detection = self.detection()?;
        let verification = self.verify_detailed(config.verify_samples, rng)?;
        let examples = (0..config.example_count)
            .map(|_| {
                let input = rng.sample_below(self.width);
                ExampleCase {
                    input,
                    actual: detection.transform(input),
                    expected: self.black_box.eval(input),
                }
            })
            .collect();

        Ok(AnalysisReport::new(detection, verification, examples))
    }
}
