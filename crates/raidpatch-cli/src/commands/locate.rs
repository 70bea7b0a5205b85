//! Locate command implementation.

use std::path::Path;

use anyhow::Result;
use raidpatch::RaidpatchConfig;

use super::resolve_paths;

/// Run the locate command
pub fn run(config: &RaidpatchConfig, game_root: Option<&Path>, json: bool) -> Result<()> {
    let paths = resolve_paths(config, game_root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    let exists = |p: &Path| if p.exists() { "" } else { " (missing)" };

    println!("Game root:    {}", paths.game_root.display());
    println!("Clean exe:    {}", paths.clean_exe.display());
    println!(
        "Patched exe:  {}{}",
        paths.patched_exe.display(),
        exists(&paths.patched_exe)
    );
    println!(
        "EAC setup:    {}{}",
        paths.eac_setup.display(),
        exists(&paths.eac_setup)
    );

    Ok(())
}
