//! Sampled verification of a reconstructed mapping.
//!
//! Single-bit probes cannot see interactions between bits, so the accepted
//! part of a [`Detection`] is replayed against the black box on random inputs
//! drawn from an injected [`SampleSource`].

use crate::detector::Detection;
use crate::oracle::BlackBox;
use crate::sampler::SampleSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A sample on which the reconstruction disagreed with the black box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Sampled input
    pub input: u64,
    /// Black-box output
    pub expected: u64,
    /// Reconstructed output
    pub actual: u64,
}

/// Result of a sampled verification run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verification {
    /// Number of samples drawn
    pub samples: u32,
    /// Every sample that did not match
    pub mismatches: Vec<Mismatch>,
}

impl Verification {
    /// True iff every sample matched
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Compare `detection` with `black_box` on `samples` inputs below its width
    pub(crate) fn run<B, R>(
        detection: &Detection,
        black_box: &B,
        samples: u32,
        rng: &mut R,
    ) -> Self
    where
        B: BlackBox + ?Sized,
        R: SampleSource + ?Sized,
    {
        let width = detection.width();
        let mut mismatches = Vec::new();

        for _ in 0..samples {
            let input = rng.sample_below(width);
            let expected = black_box.eval(input);
            let actual = detection.transform(input);
            if expected != actual {
                warn!(input, expected, actual, "verification mismatch");
                mismatches.push(Mismatch {
                    input,
                    expected,
                    actual,
                });
            }
        }

        debug!(samples, mismatches = mismatches.len(), "verification finished");
        Self {
            samples,
            mismatches,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::detector::BitMoveDetector;
    use crate::sampler::{Seed, Xorshift64};

    /// Low nibble rotated left by 2; bits 4 and 5 both land on bit 5
    fn rotate_with_collision(x: u64) -> u64 {
        let low = x & 0x0F;
        let low = ((low << 2) | (low >> 2)) & 0x0F;
        let high = if x & 0x30 != 0 { 0x20 } else { 0 };
        high | (x & 0xC0) | low
    }

    fn rng() -> Xorshift64 {
        Xorshift64::new(Seed::from_u64(0xB17))
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut detector = BitMoveDetector::new(rotate_with_collision, 8).unwrap();
        detector.detect();

        let first = detector.verify_detailed(50, &mut rng()).unwrap();
        let second = detector.verify_detailed(50, &mut rng()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mismatches_are_real() {
        let mut detector = BitMoveDetector::new(rotate_with_collision, 8).unwrap();
        detector.detect();

        let verification = detector.verify_detailed(200, &mut rng()).unwrap();
        assert_eq!(verification.samples, 200);
        assert!(!verification.passed());
        for mismatch in &verification.mismatches {
            assert_eq!(mismatch.expected, rotate_with_collision(mismatch.input));
            assert_ne!(mismatch.expected, mismatch.actual);
            // Only bit 5 without bit 4 can disagree
            assert_eq!(mismatch.input & 0x30, 0x20);
        }
    }

    #[test]
    fn test_run_against_other_black_box() {
        let mut detector = BitMoveDetector::new(|x: u64| x, 4).unwrap();
        let detection = detector.detect().clone();

        let inverted = |x: u64| !x & 0xF;
        let verification = Verification::run(&detection, &inverted, 10, &mut rng());
        assert_eq!(verification.mismatches.len(), 10);
    }

    #[test]
    fn test_zero_samples_pass() {
        let mut detector = BitMoveDetector::new(|_x: u64| 0u64, 4).unwrap();
        detector.detect();
        assert!(detector.verify(0, &mut rng()).unwrap());
        assert!(Verification::default().passed());
    }

    #[test]
    fn test_bit_interaction_escapes_single_bit_probes() {
        // Identity on single bits, but bits 0 and 1 together also set bit 2
        let interacting = |x: u64| if x & 0b11 == 0b11 { x | 0b100 } else { x };
        let mut detector = BitMoveDetector::new(interacting, 3).unwrap();
        let detection = detector.detect();

        assert!(detection.is_full_permutation());
        assert_ne!(detector.transform(0b011).unwrap(), interacting(0b011));
    }

    #[test]
    fn test_dyn_sample_source() {
        let mut detector = BitMoveDetector::new(|x: u64| x, 8).unwrap();
        detector.detect();
        let mut source = rng();
        let dyn_source: &mut dyn SampleSource = &mut source;
        assert!(detector.verify(20, dyn_source).unwrap());
    }
}
