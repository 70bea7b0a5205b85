//! Patch command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use raidpatch::{
    GamePaths, PatchKind, PatchReport, Patcher, RAID_RANGE, RaidpatchConfig, create_raid_shortcut,
    prepare_working_copy, raid_display_name,
};
use tracing::warn;

use super::hex_utils::format_hex_offset;
use super::resolve_paths;

/// Run the patch command
pub fn run(
    config: &RaidpatchConfig,
    game_root: Option<&Path>,
    raid: u32,
    exe: Option<&Path>,
    force: bool,
    json: bool,
) -> Result<()> {
    let patcher = Patcher::new();
    let raid_name = raid_display_name(raid);

    let (target, paths) = match exe {
        Some(path) => (path.to_path_buf(), None),
        None => {
            let game = resolve_paths(config, game_root)?;

            if !force && patcher.detect_current(&game.patched_exe, RAID_RANGE) == Some(raid) {
                println!(
                    "{}",
                    format!("Raid {} ({}) is already active!", raid, raid_name).yellow()
                );
                println!("Use --force to re-patch anyway.");
                return Ok(());
            }

            prepare_working_copy(&game.clean_exe, &game.patched_exe)?;
            if !json {
                println!("{} Patched executable created", "✓".green());
            }
            (game.patched_exe.clone(), Some(game))
        }
    };

    if !json {
        println!("Patching for: {}", raid_name.bold());
    }

    let report = patcher.apply(&target, raid)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.success {
        bail!("Patching failed - executable not modified");
    }

    if config.verify_after_patch && !patcher.verify(&target, raid) {
        bail!(
            "Patched executable at {} does not contain raid {}",
            target.display(),
            raid
        );
    }

    if let Some(game) = &paths {
        match create_raid_shortcut(&game.game_root, &target, raid, &raid_name) {
            Ok(shortcut) if !json => println!(
                "{} Shortcut created: {}",
                "✓".green(),
                shortcut.file_name().unwrap_or_default().to_string_lossy()
            ),
            Ok(_) => {}
            // The patched executable is usable without a shortcut
            Err(e) => warn!("Shortcut creation failed: {}", e),
        }
    }

    if !json {
        println!();
        println!("Patched executable: {}", target.display().cyan());
        println!("{}", eac_warning(paths.as_ref()));
    }

    Ok(())
}

fn eac_warning(paths: Option<&GamePaths>) -> String {
    let mut text = "EasyAntiCheat must be uninstalled for the patched executable to work."
        .yellow()
        .to_string();
    if let Some(game) = paths {
        text.push_str(&format!(
            "\nRun the uninstaller: {}",
            game.eac_setup.display().cyan()
        ));
    }
    text
}

fn print_report(report: &PatchReport) {
    if !report.success {
        println!("{} Patching failed:", "✗".red());
        for error in &report.errors {
            println!("  {} {}", "•".red(), error);
        }
        return;
    }

    println!("{} Binary patches applied", "✓".green());
    println!("Patch offsets:");
    for kind in PatchKind::ALL {
        if let Some(offset) = report.offset(kind.name()) {
            println!("  • {:<16}{}", format!("{}:", kind.label()), format_hex_offset(offset));
        }
    }
}
