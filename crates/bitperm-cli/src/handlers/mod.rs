//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod demo;
pub mod probe;
pub mod subjects;

// Re-export handlers for convenient access
pub use demo::{execute_demo, run_demo, DemoResult};
pub use probe::{execute_probe, print_report, resolve_source, ProbeSource};
pub use subjects::{execute_subjects, render_subject_list};
