//! Cleanup command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use raidpatch::{RaidpatchConfig, cleanup};

use super::resolve_paths;

/// Run the cleanup command
pub fn run(config: &RaidpatchConfig, game_root: Option<&Path>) -> Result<()> {
    let paths = resolve_paths(config, game_root)?;
    let report = cleanup(&paths.patched_exe, &paths.game_root);

    if report.patched_exe_removed {
        println!("{} Patched executable removed", "✓".green());
    } else {
        println!("{}", "• No patched executable found".dimmed());
    }

    if report.shortcuts_removed > 0 {
        println!("{} Removed {} shortcut(s)", "✓".green(), report.shortcuts_removed);
    }

    if !report.errors.is_empty() {
        for error in &report.errors {
            println!("  {} {}", "•".red(), error);
        }
        bail!("Cleanup finished with {} error(s)", report.errors.len());
    }

    println!("The original game executable was never modified.");
    Ok(())
}
