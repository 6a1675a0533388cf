//! Black-box oracles probed by the detector.
//!
//! Anything that maps a `u64` to a `u64` can be probed: closures, function
//! pointers, `Box<dyn Fn(u64) -> u64>`, or a [`TableOracle`] replaying
//! recorded outputs from a JSON file.

use crate::result::{PermError, PermResult};
use crate::width::BitWidth;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Opaque function under test
///
/// Implementations are treated as pure and deterministic. The detector only
/// calls them with inputs inside the configured bit width.
pub trait BlackBox {
    /// Evaluate the function on `input`
    fn eval(&self, input: u64) -> u64;
}

impl<F> BlackBox for F
where
    F: Fn(u64) -> u64,
{
    fn eval(&self, input: u64) -> u64 {
        self(input)
    }
}

/// Largest width a replay table may cover (2^20 recorded outputs)
pub const MAX_TABLE_WIDTH: u32 = 20;

/// Serialized form of a replay table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableDocument {
    width: u32,
    outputs: Vec<u64>,
}

/// Oracle that replays a recorded output for every input of its domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOracle {
    width: BitWidth,
    outputs: Vec<u64>,
}

impl TableOracle {
    /// Build a table oracle; `outputs` must hold exactly `2^width` entries
    pub fn new(width: u32, outputs: Vec<u64>) -> PermResult<Self> {
        if width > MAX_TABLE_WIDTH {
            return Err(PermError::invalid_table(format!(
                "width {width} exceeds the table maximum of {MAX_TABLE_WIDTH}"
            )));
        }
        let width = BitWidth::new(width)?;
        let expected = 1usize << width.bits();
        if outputs.len() != expected {
            return Err(PermError::invalid_table(format!(
                "expected {expected} outputs for {width}, found {}",
                outputs.len()
            )));
        }
        Ok(Self { width, outputs })
    }

    /// Record every output of `black_box` over a `width`-bit domain
    pub fn record<B: BlackBox + ?Sized>(black_box: &B, width: u32) -> PermResult<Self> {
        if width > MAX_TABLE_WIDTH {
            return Err(PermError::invalid_table(format!(
                "width {width} exceeds the table maximum of {MAX_TABLE_WIDTH}"
            )));
        }
        let domain = BitWidth::new(width)?;
        let outputs = (0..=domain.mask()).map(|x| black_box.eval(x)).collect();
        Self::new(width, outputs)
    }

    /// Parse a table from its JSON document form
    pub fn from_json_str(json: &str) -> PermResult<Self> {
        let doc: TableDocument = serde_json::from_str(json)?;
        Self::new(doc.width, doc.outputs)
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> PermResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the table to its JSON document form
    pub fn to_json(&self) -> PermResult<String> {
        let doc = TableDocument {
            width: self.width.bits(),
            outputs: self.outputs.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Save the table to a JSON file
    pub fn save(&self, path: &Path) -> PermResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Width of the recorded domain
    #[must_use]
    pub const fn width(&self) -> BitWidth {
        self.width
    }

    /// Recorded outputs indexed by input
    #[must_use]
    pub fn outputs(&self) -> &[u64] {
        &self.outputs
    }
}

impl BlackBox for TableOracle {
    fn eval(&self, input: u64) -> u64 {
        // Index is in range: the table holds exactly mask() + 1 entries
        self.outputs[(input & self.width.mask()) as usize]
    }
}
