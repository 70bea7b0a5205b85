//! Detect command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use raidpatch::{Patcher, RAID_RANGE, RaidpatchConfig, raid_display_name};

use super::target_exe;

/// Run the detect command
pub fn run(config: &RaidpatchConfig, game_root: Option<&Path>, exe: Option<&Path>) -> Result<()> {
    let target = target_exe(config, game_root, exe)?;

    match Patcher::new().detect_current(&target, RAID_RANGE) {
        Some(raid) => println!(
            "{} Raid {} - {}",
            "Current patch:".yellow(),
            raid,
            raid_display_name(raid)
        ),
        None => println!("No raid patch detected in {}", target.display()),
    }

    Ok(())
}
