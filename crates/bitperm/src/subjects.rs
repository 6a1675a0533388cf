//! Built-in black boxes for demos and smoke checks.
//!
//! The first three entries of [`demo_scenarios`] reproduce the classic
//! walkthrough: a partially valid rotation with a collision, a mixed mapping
//! with both collision and fan-out, and a clean 5-bit reversal.

use crate::oracle::BlackBox;

/// A named black box with the width it is meant to be probed at
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    /// Lookup name
    pub name: &'static str,
    /// Intended bit width
    pub width: u32,
    /// One-line description
    pub description: &'static str,
    function: fn(u64) -> u64,
}

impl BlackBox for Subject {
    fn eval(&self, input: u64) -> u64 {
        (self.function)(input)
    }
}

fn identity(x: u64) -> u64 {
    x & 0xFF
}

fn reverse5(x: u64) -> u64 {
    (0..5)
        .filter(|&i| x & (1 << i) != 0)
        .fold(0, |acc, i| acc | (1 << (4 - i)))
}

fn rotate_nibble_collision(x: u64) -> u64 {
    let low = x & 0x0F;
    let low = ((low << 2) | (low >> 2)) & 0x0F;

    let mut high = 0;
    if x & 0x10 != 0 {
        high |= 0x20;
    }
    // Same target as bit 4
    if x & 0x20 != 0 {
        high |= 0x20;
    }
    if x & 0x40 != 0 {
        high |= 0x40;
    }
    if x & 0x80 != 0 {
        high |= 0x80;
    }
    low | high
}

fn mixed(x: u64) -> u64 {
    let mut result = 0;
    if x & 0x01 != 0 {
        result |= 0x04;
    }
    if x & 0x02 != 0 {
        result |= 0x08;
    }
    if x & 0x04 != 0 {
        result |= 0x10;
    }
    if x & 0x08 != 0 {
        result |= 0x10;
    }
    if x & 0x10 != 0 {
        result |= 0x01 | 0x20;
    }
    if x & 0x20 != 0 {
        result |= 0x02;
    }
    result & 0x3F
}

fn rotate_left_1(x: u64) -> u64 {
    ((x << 1) | (x >> 7)) & 0xFF
}

fn shift_left_1(x: u64) -> u64 {
    (x << 1) & 0xFF
}

fn shift_overflow(x: u64) -> u64 {
    x << 1
}

const SUBJECTS: &[Subject] = &[
    Subject {
        name: "rotate-nibble-collision",
        width: 8,
        description: "low nibble rotated left by 2; bits 4 and 5 both land on bit 5",
        function: rotate_nibble_collision,
    },
    Subject {
        name: "mixed",
        width: 6,
        description: "valid routes, a collision on bit 4 and a fan-out from bit 4",
        function: mixed,
    },
    Subject {
        name: "reverse",
        width: 5,
        description: "full bit reversal of the low 5 bits",
        function: reverse5,
    },
    Subject {
        name: "identity",
        width: 8,
        description: "every bit stays in place",
        function: identity,
    },
    Subject {
        name: "rotate-left-1",
        width: 8,
        description: "8-bit rotation left by one",
        function: rotate_left_1,
    },
    Subject {
        name: "shift-left-1",
        width: 8,
        description: "8-bit shift left by one; bit 7 is absorbed, bit 0 uncovered",
        function: shift_left_1,
    },
    Subject {
        name: "shift-overflow",
        width: 4,
        description: "unmasked shift left; bit 3 leaves the 4-bit range",
        function: shift_overflow,
    },
];

/// Every built-in subject
#[must_use]
pub fn all() -> &'static [Subject] {
    SUBJECTS
}

/// Find a subject by name
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.name == name)
}

/// The three walkthrough scenarios, in order
#[must_use]
pub fn demo_scenarios() -> &'static [Subject] {
    &SUBJECTS[..3]
}
