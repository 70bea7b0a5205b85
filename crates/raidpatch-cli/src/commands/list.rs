//! List command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use raidpatch::{Patcher, RAID_RANGE, RaidpatchConfig, all_raids};
use tracing::debug;

use super::resolve_paths;

/// Run the list command
pub fn run(config: &RaidpatchConfig, game_root: Option<&Path>) -> Result<()> {
    // Listing works without an installation; only the marker needs one
    let current = match resolve_paths(config, game_root) {
        Ok(paths) => Patcher::new().detect_current(&paths.patched_exe, RAID_RANGE),
        Err(e) => {
            debug!("Skipping current raid detection: {:#}", e);
            None
        }
    };

    println!("{:>3}  Raid Boss", "#");
    for (index, name) in all_raids() {
        if Some(index) == current {
            println!(
                "{:>3}  {} {}",
                index.green(),
                name.green().bold(),
                "(current)".dimmed()
            );
        } else {
            println!("{:>3}  {}", index, name);
        }
    }
    println!();
    println!("{}", "Note: Only one raid can be active at a time".dimmed());

    Ok(())
}
