//! Choice setup hooks.
//!
//! Hosts run a `ChoicePipeline` right before their own choice-window setup. Each hook
//! receives the command list and cursor along with the menu settings read from the
//! current command, and hands back (possibly changed) settings plus an optional
//! replacement list. Hooks run in registration order; each sees the list left by the
//! one before it.

use std::borrow::Cow;

use anyhow::{Context, Result};
use choice_data::{ChoiceParams, Command};
use log::debug;

use crate::config::MergeConfig;
use crate::merger::ChoiceMerger;

/// What a hook hands back to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Interception {
    pub params: ChoiceParams,
    /// Replacement command list for the rest of the event run, if the hook built one.
    pub commands: Option<Vec<Command>>,
}

impl Interception {
    /// Leave the settings as received and keep the current list.
    pub fn passthrough(params: ChoiceParams) -> Self {
        Self { params, commands: None }
    }
}

/// A preprocessing step run before the host sets up a choice window.
pub trait ChoiceSetupHook {
    /// Short name used in logs and error context.
    fn name(&self) -> &str;

    /// Inspect or rewrite the choice setup for the menu at `index`.
    ///
    /// # Errors
    /// Hooks may refuse the setup; the pipeline stops at the first error.
    fn intercept(&self, commands: &[Command], index: usize, params: ChoiceParams) -> Result<Interception>;
}

impl ChoiceSetupHook for ChoiceMerger {
    fn name(&self) -> &str {
        "choice-merger"
    }

    fn intercept(&self, commands: &[Command], index: usize, params: ChoiceParams) -> Result<Interception> {
        if !self.config().enabled {
            return Ok(Interception::passthrough(params));
        }
        let merged = self.merge(commands, index, &params)?;
        if merged.blocks <= 1 {
            return Ok(Interception::passthrough(merged.params));
        }
        Ok(Interception {
            params: merged.params,
            commands: Some(merged.commands),
        })
    }
}

/// Settings and command list the host should use after all hooks have run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChoices<'a> {
    pub params: ChoiceParams,
    /// Borrowed when no hook replaced the list.
    pub commands: Cow<'a, [Command]>,
}

/// Ordered chain of `ChoiceSetupHook`s.
#[derive(Default)]
pub struct ChoicePipeline {
    hooks: Vec<Box<dyn ChoiceSetupHook>>,
}

impl ChoicePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline holding only the choice merger.
    pub fn with_merger(config: MergeConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline.register(ChoiceMerger::new(config));
        pipeline
    }

    /// Append a hook to the end of the chain.
    pub fn register(&mut self, hook: impl ChoiceSetupHook + 'static) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook over the choice setup at `index`.
    ///
    /// # Errors
    /// Returns the first hook error, tagged with the hook's name.
    pub fn run<'a>(&self, commands: &'a [Command], index: usize, params: ChoiceParams) -> Result<PreparedChoices<'a>> {
        let mut current: Cow<'a, [Command]> = Cow::Borrowed(commands);
        let mut params = params;
        for hook in &self.hooks {
            let interception = hook
                .intercept(&current, index, params)
                .with_context(|| format!("in choice setup hook '{}'", hook.name()))?;
            params = interception.params;
            if let Some(list) = interception.commands {
                debug!("hook '{}' replaced the command list ({} commands)", hook.name(), list.len());
                current = Cow::Owned(list);
            }
        }
        Ok(PreparedChoices {
            params,
            commands: current,
        })
    }
}
