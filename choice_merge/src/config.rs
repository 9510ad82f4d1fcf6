//! Merge settings and their TOML loader.
//!
//! Settings live under a `[merge]` table:
//!
//! ```toml
//! [merge]
//! enabled = true
//! strict = false
//! ```
//!
//! Missing keys take their defaults, and a missing or unreadable file falls back to the
//! defaults entirely.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Behavior switches for the choice merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// When false, choice menus are shown exactly as authored.
    pub enabled: bool,
    /// Validate the command list before merging and refuse malformed ones.
    pub strict: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict: false,
        }
    }
}

/// Wrapper for the TOML file holding the `[merge]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    merge: MergeConfig,
}

/// Loads merge settings from a TOML file, falling back to defaults on error.
///
/// # Logging
/// - `info!` on successful load
/// - `warn!` if the file cannot be read or parsed
pub fn load_config(toml_path: &Path) -> MergeConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!(
                "merge settings loaded from '{}' (enabled: {}, strict: {})",
                toml_path.display(),
                config.enabled,
                config.strict
            );
            config
        },
        Err(e) => {
            warn!(
                "Could not load merge settings from '{}': {e:#}. Using defaults.",
                toml_path.display()
            );
            MergeConfig::default()
        },
    }
}

/// Attempts to load merge settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn try_load_config(toml_path: &Path) -> Result<MergeConfig> {
    let text = fs::read_to_string(toml_path)
        .with_context(|| format!("reading merge settings from '{}'", toml_path.display()))?;
    let file: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parsing merge settings from '{}'", toml_path.display()))?;
    Ok(file.merge)
}
