use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "raidpatch")]
#[command(about = "Enable offline raid battles in Dragon Ball FighterZ")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/raidpatch/config.toml)
    #[arg(short, long, global = true, env = "RAIDPATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Game installation root, skips Steam discovery
    #[arg(long, global = true)]
    pub game_root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all raids, marking the one currently patched
    List,

    /// Show the discovered game installation
    Locate {
        #[arg(long)]
        json: bool,
    },

    /// Patch a fresh working copy of the game for a raid
    Patch {
        /// Raid number (1-38)
        #[arg(value_parser = parse_raid)]
        raid: u32,

        /// Patch this file in place instead of the game's working copy
        #[arg(long)]
        exe: Option<PathBuf>,

        /// Re-patch even if the raid is already active
        #[arg(short, long)]
        force: bool,

        /// Print the patch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that an executable is patched for a raid
    Verify {
        #[arg(value_parser = parse_raid)]
        raid: u32,

        #[arg(long)]
        exe: Option<PathBuf>,
    },

    /// Detect which raid an executable is patched for
    Detect {
        #[arg(long)]
        exe: Option<PathBuf>,
    },

    /// Remove the patched working copy
    Cleanup,

    /// Find the first match of a byte pattern in a file (e.g. "8B 81 ?? 53")
    Scan {
        pattern: String,

        #[arg(long)]
        exe: PathBuf,
    },
}

pub fn parse_raid(s: &str) -> Result<u32, String> {
    let raid: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a raid number", s))?;
    if !raidpatch::is_valid_raid_index(raid) {
        return Err(format!(
            "Invalid raid number {}. Must be {}-{}.",
            raid,
            raidpatch::RAID_RANGE.start(),
            raidpatch::RAID_RANGE.end()
        ));
    }
    Ok(raid)
}
