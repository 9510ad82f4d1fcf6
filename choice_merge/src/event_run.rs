//! Host-side view of a running event: the authored command list plus a cursor.
//!
//! When the cursor reaches a choice menu, `setup_choices` runs the hook pipeline and
//! from then on serves the rewritten list the hooks produced. The authored list is only
//! ever borrowed, so the event plays out the same way the next time it starts.

use std::borrow::Cow;

use anyhow::Result;
use choice_data::{ChoiceParams, Command};
use log::info;

use crate::hook::{ChoicePipeline, PreparedChoices};
use crate::scan::command_at;

#[derive(Debug, Clone)]
pub struct EventRun<'a> {
    authored: &'a [Command],
    working: Option<Vec<Command>>,
    index: usize,
}

impl<'a> EventRun<'a> {
    pub fn new(authored: &'a [Command]) -> Self {
        Self::at(authored, 0)
    }

    /// Start the run with the cursor at `index`.
    pub fn at(authored: &'a [Command], index: usize) -> Self {
        Self {
            authored,
            working: None,
            index,
        }
    }

    /// The list the run currently executes: the rewritten copy if a hook made one.
    pub fn commands(&self) -> &[Command] {
        self.working.as_deref().unwrap_or(self.authored)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn command_at(&self, position: usize) -> &Command {
        command_at(self.commands(), position)
    }

    pub fn current_command(&self) -> &Command {
        self.command_at(self.index)
    }

    /// True once a hook has replaced the authored list for this run.
    pub fn is_rewritten(&self) -> bool {
        self.working.is_some()
    }

    /// Prepare the choice menu under the cursor.
    ///
    /// Returns the settings the host should show, or `None` if the cursor is not on a
    /// choice menu.
    ///
    /// # Errors
    /// Propagates the first hook failure; the run is left unchanged in that case.
    pub fn setup_choices(&mut self, pipeline: &ChoicePipeline) -> Result<Option<ChoiceParams>> {
        let Some(params) = self.current_command().choice_params().cloned() else {
            return Ok(None);
        };
        let PreparedChoices { params, commands } = pipeline.run(self.commands(), self.index, params)?;
        let replacement = match commands {
            Cow::Owned(list) => Some(list),
            Cow::Borrowed(_) => None,
        };
        if let Some(list) = replacement {
            info!("event run at {} now uses a rewritten list of {} commands", self.index, list.len());
            self.working = Some(list);
        }
        Ok(Some(params))
    }
}
