//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod cleanup;
pub mod detect;
pub mod hex_utils;
pub mod list;
pub mod locate;
pub mod patch;
pub mod scan;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use raidpatch::{GameLocator, GamePaths, RaidpatchConfig};

/// Locate the game, honoring a `--game-root` given on the command line.
pub fn resolve_paths(config: &RaidpatchConfig, game_root: Option<&Path>) -> Result<GamePaths> {
    let mut locator = GameLocator::from_config(config);
    if let Some(root) = game_root {
        locator = locator.with_game_root(root);
    }
    locator
        .find_and_validate()
        .context("Could not find the game installation. Pass --game-root to set it manually")
}

/// The file to inspect: `--exe` if given, otherwise the game's working copy.
pub fn target_exe(
    config: &RaidpatchConfig,
    game_root: Option<&Path>,
    exe: Option<&Path>,
) -> Result<PathBuf> {
    match exe {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(resolve_paths(config, game_root)?.patched_exe),
    }
}
