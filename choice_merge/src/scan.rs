//! Command-list accessors used while walking choice menus.
//!
//! Both helpers are total: lookups past the end of the list return the neutral
//! empty command, and successor scans stop at the list length, so every walk
//! built on them terminates.

use choice_data::Command;

/// Fetch the command at `position`, or the neutral empty command when out of range.
pub fn command_at(commands: &[Command], position: usize) -> &Command {
    commands.get(position).unwrap_or(Command::empty())
}

/// Position of the next command at the same indent as the one at `position`.
///
/// Deeper commands (branch bodies) are skipped. The scan also stops at the first
/// shallower command, since that closes the enclosing body and anything after it
/// belongs to a different block; callers compare indents before treating the
/// result as a sibling. Returns `commands.len()` when nothing follows.
pub fn same_indent_successor(commands: &[Command], position: usize) -> usize {
    let indent = command_at(commands, position).indent;
    commands
        .iter()
        .enumerate()
        .skip(position.saturating_add(1))
        .find(|(_, command)| command.indent <= indent)
        .map_or(commands.len(), |(next, _)| next)
}

/// True when the command at `position` is a sibling at `indent` satisfying `pred`.
pub(crate) fn sibling_is(commands: &[Command], position: usize, indent: usize, pred: fn(&Command) -> bool) -> bool {
    let command = command_at(commands, position);
    position < commands.len() && command.indent == indent && pred(command)
}
