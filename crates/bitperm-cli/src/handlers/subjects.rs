//! Subjects command handler

use crate::config::CliConfig;
use crate::output::Reporter;
use bitperm::Subject;

/// Render the built-in subject list as aligned text
#[must_use]
pub fn render_subject_list(subjects: &[Subject]) -> String {
    let name_width = subjects.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut output = String::new();
    for subject in subjects {
        output.push_str(&format!(
            "  {:<name_width$}  {:>2} bits  {}\n",
            subject.name, subject.width, subject.description
        ));
    }
    output
}

/// Execute the subjects command
pub fn execute_subjects(config: &CliConfig) {
    let reporter = Reporter::new(config.color.should_color(), false);
    reporter.header("Built-in subjects");
    reporter.raw(render_subject_list(bitperm::subjects::all()).trim_end());
}
