//! Bitperm: Black-Box Bit-Permutation Inference
//!
//! Given an opaque function over an N-bit integer, Bitperm works out whether it
//! routes each input bit to exactly one output bit, records the routes that
//! hold, flags the bits that do not, and checks the reconstruction against the
//! real function on seeded random samples.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    BITPERM Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Black Box  │    │ Detector   │    │ Analysis   │            │
//! │   │ (oracle)   │◄──►│ probe/     │───►│ Report     │            │
//! │   │            │    │ verify     │    │ text/json  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │                          ▲                                       │
//! │                          │ seeded samples                        │
//! │                     ┌────────────┐                               │
//! │                     │ Xorshift64 │                               │
//! │                     └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use bitperm::{render_analysis_report, BitMoveDetector, ReportConfig, Seed, Xorshift64};
//!
//! let rotate = |x: u64| ((x << 1) | (x >> 7)) & 0xFF;
//! let mut rng = Xorshift64::new(Seed::from_u64(1));
//! let config = ReportConfig::default();
//! let report = BitMoveDetector::quick_detect(rotate, 8, &config, &mut rng).unwrap();
//! assert!(report.is_full_permutation());
//! assert!(render_analysis_report(&report).contains("bit 7 -> 0"));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Bit-mapping detector: probing, conflict resolution, transform
mod detector;
mod oracle;
mod report;
mod result;
mod sampler;
mod verify;
mod width;

/// Built-in demonstration black boxes
pub mod subjects;

pub use detector::{AnomalyKind, BitAnomaly, BitMapping, BitMoveDetector, Detection, ProbeRecord};
pub use oracle::{BlackBox, TableOracle, MAX_TABLE_WIDTH};
pub use report::{
    render_analysis_json, render_analysis_report, AnalysisReport, ExampleCase, InvalidBit,
    MappingEntry, ReportConfig, VerificationSummary,
};
pub use result::{PermError, PermResult};
pub use sampler::{SampleSource, Seed, Xorshift64};
pub use subjects::Subject;
pub use verify::{Mismatch, Verification};
pub use width::BitWidth;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        AnalysisReport, BitMapping, BitMoveDetector, BitWidth, BlackBox, Detection, PermError,
        PermResult, ReportConfig, SampleSource, Seed, Xorshift64,
    };
}
