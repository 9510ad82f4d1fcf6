use std::fmt;

use crate::*;

/// Structural problem found in a command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnclosedChoices { position: usize, indent: usize },
    StrayBranch { position: usize },
    StrayEnd { position: usize },
    MisalignedBranch { position: usize, expected: usize, found: usize },
    ShallowBody { position: usize, indent: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnclosedChoices { position, indent } => {
                write!(f, "choice menu at {position} (indent {indent}) has no matching end")
            },
            ValidationError::StrayBranch { position } => {
                write!(f, "choice branch at {position} is outside any choice menu")
            },
            ValidationError::StrayEnd { position } => {
                write!(f, "choice menu end at {position} closes no open menu")
            },
            ValidationError::MisalignedBranch {
                position,
                expected,
                found,
            } => {
                write!(f, "choice branch at {position} has indent {found}, menu indent is {expected}")
            },
            ValidationError::ShallowBody { position, indent } => {
                write!(
                    f,
                    "command at {position} sits at menu indent {indent} instead of inside a branch body"
                )
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that choice menus in `commands` are balanced and their branches line up.
///
/// ```
/// use choice_data::{ChoiceParams, Command, validate_commands};
///
/// let params = ChoiceParams {
///     options: vec!["Yes".into(), "No".into()],
///     ..ChoiceParams::default()
/// };
/// let commands = vec![
///     Command::open_choices(0, params),
///     Command::option_branch(0, 0, "Yes"),
///     Command::other(1, 0, Vec::new()),
///     Command::option_branch(0, 1, "No"),
///     Command::other(1, 0, Vec::new()),
///     Command::end_choices(0),
/// ];
/// assert!(validate_commands(&commands).is_empty());
/// ```
pub fn validate_commands(commands: &[Command]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    // (position, indent) of each menu still waiting for its end
    let mut open: Vec<(usize, usize)> = Vec::new();

    for (position, command) in commands.iter().enumerate() {
        // a shallower command means the deeper menu was never closed
        while let Some(&(start, indent)) = open.last() {
            if indent <= command.indent {
                break;
            }
            errors.push(ValidationError::UnclosedChoices { position: start, indent });
            open.pop();
        }
        let top = open.last().copied();

        match &command.kind {
            CommandKind::OptionBranch(_) | CommandKind::CancelBranch(_) => match top {
                Some((_, indent)) if indent == command.indent => {},
                Some((_, indent)) => errors.push(ValidationError::MisalignedBranch {
                    position,
                    expected: indent,
                    found: command.indent,
                }),
                None => errors.push(ValidationError::StrayBranch { position }),
            },
            CommandKind::EndChoices => match top {
                Some((_, indent)) if indent == command.indent => {
                    open.pop();
                },
                _ => errors.push(ValidationError::StrayEnd { position }),
            },
            CommandKind::OpenChoices(_) | CommandKind::Other { .. } => {
                if let Some((_, indent)) = top
                    && indent == command.indent
                {
                    errors.push(ValidationError::ShallowBody { position, indent });
                }
                if command.is_open_choices() {
                    open.push((position, command.indent));
                }
            },
        }
    }

    for (position, indent) in open.into_iter().rev() {
        errors.push(ValidationError::UnclosedChoices { position, indent });
    }
    errors
}
