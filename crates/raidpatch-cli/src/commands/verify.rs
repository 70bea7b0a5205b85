//! Verify command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use raidpatch::{Patcher, RaidpatchConfig, raid_display_name};

use super::target_exe;

/// Run the verify command
pub fn run(
    config: &RaidpatchConfig,
    game_root: Option<&Path>,
    raid: u32,
    exe: Option<&Path>,
) -> Result<()> {
    let target = target_exe(config, game_root, exe)?;

    if !Patcher::new().verify(&target, raid) {
        bail!(
            "{} is not patched for raid {} ({})",
            target.display(),
            raid,
            raid_display_name(raid)
        );
    }

    println!(
        "{} {} is patched for raid {} ({})",
        "✓".green(),
        target.display(),
        raid,
        raid_display_name(raid)
    );
    Ok(())
}
