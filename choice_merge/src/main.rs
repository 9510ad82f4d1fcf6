#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** choice_merge **
//! Joins adjacent choice menus in event command lists.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use choice_data::Command;
use choice_merge::{ChoiceMerger, load_commands, load_config, write_commands};

#[derive(Debug, Parser)]
#[command(name = "choice_merge", version, about = "Join adjacent choice menus in event command lists")]
struct Cli {
    /// Event command list (JSON; RON when the extension is .ron)
    input: PathBuf,
    /// Merge only the run of menus starting at this command position
    #[arg(long)]
    at: Option<usize>,
    /// Merge settings file
    #[arg(long, default_value = "choice_merge.toml")]
    config: PathBuf,
    /// Write output here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Only report structural problems in the command list
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("choice_merge {} starting", choice_merge::CHOICE_MERGE_VERSION);

    let commands = load_commands(&cli.input).context("while loading event commands")?;

    if cli.check {
        let problems = choice_data::validate_commands(&commands);
        for problem in &problems {
            println!("{problem}");
        }
        if !problems.is_empty() {
            process::exit(1);
        }
        println!("{} commands, no problems found", commands.len());
        return Ok(());
    }

    let merger = ChoiceMerger::new(load_config(&cli.config));

    if let Some(at) = cli.at {
        let params = commands
            .get(at)
            .and_then(Command::choice_params)
            .cloned()
            .with_context(|| format!("command {at} is not a choice menu"))?;
        let merged = merger.merge(&commands, at, &params)?;
        info!(
            "joined {} menu(s), dropped {} command(s)",
            merged.blocks, merged.removed
        );
        let report = serde_json::json!({
            "params": merged.params.to_parameters(),
            "commands": merged.commands,
        });
        let text = serde_json::to_string_pretty(&report).context("while encoding merge report")?;
        return emit(cli.out.as_deref(), &text);
    }

    let rewritten = merger.merge_all(&commands)?;
    match &cli.out {
        Some(path) => write_commands(path, &rewritten),
        None => {
            let text = serde_json::to_string_pretty(&rewritten).context("while encoding commands")?;
            emit(None, &text)
        },
    }
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing '{}'", path.display())),
        None => {
            println!("{text}");
            Ok(())
        },
    }
}
