//! Validated bit width of the probed domain.

use crate::result::{PermError, PermResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of low-order bits that make up the domain and codomain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BitWidth(u32);

impl BitWidth {
    /// Largest supported width (the engine works on `u64`)
    pub const MAX: u32 = u64::BITS;

    /// Create a width, rejecting 0 and anything above [`BitWidth::MAX`]
    pub fn new(bits: u32) -> PermResult<Self> {
        if bits == 0 {
            return Err(PermError::invalid_configuration(
                "bit width must be at least 1",
            ));
        }
        if bits > Self::MAX {
            return Err(PermError::invalid_configuration(format!(
                "bit width {bits} exceeds the supported maximum of {}",
                Self::MAX
            )));
        }
        Ok(Self(bits))
    }

    /// Number of valid bits
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Number of valid bits as an index bound
    #[must_use]
    pub const fn len(self) -> usize {
        self.0 as usize
    }

    /// A width is never empty; present for API symmetry with `len`
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Mask selecting the low `bits()` bits
    #[must_use]
    pub const fn mask(self) -> u64 {
        if self.0 == Self::MAX {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }

    /// Whether `value` fits entirely inside the low `bits()` bits
    #[must_use]
    pub const fn contains(self, value: u64) -> bool {
        value & !self.mask() == 0
    }

    /// Render `value` as a zero-padded binary string of exactly `bits()` digits
    #[must_use]
    pub fn to_binary(self, value: u64) -> String {
        format!("{:0width$b}", value & self.mask(), width = self.len())
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = PermError;

    fn try_from(bits: u32) -> PermResult<Self> {
        Self::new(bits)
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> Self {
        width.0
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}
