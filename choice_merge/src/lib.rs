#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const CHOICE_MERGE_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod config;
pub mod error;
pub mod event_run;
pub mod hook;
pub mod loader;
pub mod merger;
pub mod precedence;
pub mod scan;

// Re-exports for convenience
pub use config::{MergeConfig, load_config};
pub use error::MergeError;
pub use event_run::EventRun;
pub use hook::{ChoicePipeline, ChoiceSetupHook, Interception, PreparedChoices};
pub use loader::{load_commands, write_commands};
pub use merger::{ChoiceMerger, MergedChoices, merge_all_choices, merge_choices};
