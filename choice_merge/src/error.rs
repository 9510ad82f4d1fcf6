//! Errors raised by the checked merge entry points.
//!
//! The core merge never fails; these only come from `ChoiceMerger`, which refuses to
//! start off a choice menu and, in strict mode, refuses malformed lists.

use choice_data::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("command at position {position} does not open a choice menu")]
    NotAChoiceMenu { position: usize },
    #[error("command list is malformed ({} problem(s)): {}", .problems.len(), summarize(.problems))]
    Malformed { problems: Vec<ValidationError> },
}

fn summarize(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
