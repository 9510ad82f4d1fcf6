//! Choice Merger
//!
//! Authors often need more options than a single choice menu can hold. Placing two or
//! more choice menus back to back at the same indent lets them be shown as one: when
//! the host reaches the first menu, this module walks the following sibling menus,
//! joins their options, renumbers their option branches into the joined index space
//! and drops the end/open pairs that sat between them.
//!
//! Any other command between two menus at the same indent ends the run, which is how
//! authors opt out.
//!
//! The authored list is never touched. Each merge works on its own copy; positions to
//! drop are collected during the walk and filtered out in one pass at the end.
//!
//! ### Merged settings
//! - options: concatenated in block order
//! - cancel / default: see [`crate::precedence`]
//! - window position and background: always those of the first block
//! - only the first "When Cancel" branch of the run is kept; later ones go with their bodies

use std::collections::BTreeSet;

use choice_data::{ChoiceParams, Command, CommandKind, validate_commands};
use log::{debug, info, warn};

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::precedence::{resolve_cancel, resolve_default};
use crate::scan::{command_at, same_indent_successor, sibling_is};

/// Result of merging one run of choice menus.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedChoices {
    /// Settings for the single menu the host should show.
    pub params: ChoiceParams,
    /// Working copy of the command list with the run collapsed into one block.
    pub commands: Vec<Command>,
    /// Number of authored menus joined (0 if the start position held no menu).
    pub blocks: usize,
    /// Number of commands dropped from the working copy.
    pub removed: usize,
}

/// Merge the run of adjacent choice menus starting at `start`.
///
/// `params` are the settings the host read from the first menu. When `start` does not
/// hold a choice menu the params come back unchanged with an untouched copy of the list.
pub fn merge_choices(commands: &[Command], start: usize, params: &ChoiceParams) -> MergedChoices {
    let mut working = commands.to_vec();
    let indent = command_at(&working, start).indent;

    let mut merged = params.clone();
    let mut deletions = BTreeSet::new();
    let mut cursor = start;
    let mut previous_end: Option<usize> = None;
    let mut next_option = 0;
    let mut cancel_seen = false;
    let mut blocks = 0;

    while sibling_is(&working, cursor, indent, Command::is_open_choices) {
        if let Some(end) = previous_end {
            deletions.insert(end);
            deletions.insert(cursor);
            if let Some(block) = command_at(&working, cursor).choice_params() {
                let offset = merged.options.len();
                merged.cancel = resolve_cancel(merged.cancel, block.cancel, offset);
                merged.default = resolve_default(merged.default, block.default, offset);
                merged.options.extend(block.options.iter().cloned());
                debug!(
                    "joined choice block at {cursor}: {} option(s) after offset {offset}",
                    block.options.len()
                );
            }
        }
        blocks += 1;
        let block_start = cursor;

        cursor = same_indent_successor(&working, cursor);
        while sibling_is(&working, cursor, indent, Command::is_branch) {
            let successor = same_indent_successor(&working, cursor);
            match &mut working[cursor].kind {
                CommandKind::CancelBranch(_) if cancel_seen => {
                    // drop the branch together with its body
                    deletions.extend(cursor..successor);
                },
                CommandKind::CancelBranch(_) => cancel_seen = true,
                CommandKind::OptionBranch(branch) => {
                    branch.index = next_option;
                    next_option += 1;
                },
                _ => {},
            }
            cursor = successor;
        }

        if !sibling_is(&working, cursor, indent, Command::is_end_choices) {
            warn!("choice menu at {block_start} is not closed at indent {indent}; merge run stops here");
            break;
        }
        previous_end = Some(cursor);
        cursor = same_indent_successor(&working, cursor);
    }

    if blocks > 0 {
        working[start].kind = CommandKind::OpenChoices(merged.clone());
    }
    if blocks > 1 {
        info!(
            "merged {blocks} choice menus at {start} into one with {} options",
            merged.options.len()
        );
    }
    let removed = deletions.len();
    let commands = working
        .into_iter()
        .enumerate()
        .filter(|(position, _)| !deletions.contains(position))
        .map(|(_, command)| command)
        .collect();

    MergedChoices {
        params: merged,
        commands,
        blocks,
        removed,
    }
}

/// Collapse every run of adjacent choice menus in `commands`.
///
/// Outer menus are merged before the menus nested in their branch bodies. Each surviving
/// menu carries its merged settings, so the result can run on a host without the hook.
/// Running it again on its own output changes nothing.
pub fn merge_all_choices(commands: &[Command]) -> Vec<Command> {
    let mut working = commands.to_vec();
    let mut position = 0;
    while position < working.len() {
        if let Some(params) = working[position].choice_params().cloned() {
            working = merge_choices(&working, position, &params).commands;
        }
        position += 1;
    }
    working
}

/// Config-aware front end to the merge functions.
#[derive(Debug, Clone, Default)]
pub struct ChoiceMerger {
    config: MergeConfig,
}

impl ChoiceMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge the run at `start`, checking the list first.
    ///
    /// When merging is disabled the params and list pass through unchanged.
    ///
    /// # Errors
    /// - `NotAChoiceMenu` if `start` does not hold a choice menu
    /// - `Malformed` in strict mode when the list has structural problems
    pub fn merge(&self, commands: &[Command], start: usize, params: &ChoiceParams) -> Result<MergedChoices, MergeError> {
        if !command_at(commands, start).is_open_choices() {
            return Err(MergeError::NotAChoiceMenu { position: start });
        }
        if !self.config.enabled {
            return Ok(MergedChoices {
                params: params.clone(),
                commands: commands.to_vec(),
                blocks: 1,
                removed: 0,
            });
        }
        self.check(commands)?;
        Ok(merge_choices(commands, start, params))
    }

    /// Collapse every run in the list, honoring the enabled/strict settings.
    ///
    /// # Errors
    /// - `Malformed` in strict mode when the list has structural problems
    pub fn merge_all(&self, commands: &[Command]) -> Result<Vec<Command>, MergeError> {
        if !self.config.enabled {
            info!("choice merging disabled; command list left as authored");
            return Ok(commands.to_vec());
        }
        self.check(commands)?;
        Ok(merge_all_choices(commands))
    }

    fn check(&self, commands: &[Command]) -> Result<(), MergeError> {
        let problems = validate_commands(commands);
        if problems.is_empty() {
            return Ok(());
        }
        if self.config.strict {
            return Err(MergeError::Malformed { problems });
        }
        for problem in &problems {
            warn!("merging over malformed command list: {problem}");
        }
        Ok(())
    }
}
