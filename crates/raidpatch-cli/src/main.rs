mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use raidpatch::RaidpatchConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("raidpatch={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("raidpatch {} started", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => RaidpatchConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RaidpatchConfig::load().context("Failed to load config")?,
    };
    debug!("Config: {:?}", config);

    let game_root = args.game_root.as_deref();

    match args.command {
        Command::List => commands::list::run(&config, game_root),
        Command::Locate { json } => commands::locate::run(&config, game_root, json),
        Command::Patch {
            raid,
            exe,
            force,
            json,
        } => commands::patch::run(&config, game_root, raid, exe.as_deref(), force, json),
        Command::Verify { raid, exe } => {
            commands::verify::run(&config, game_root, raid, exe.as_deref())
        }
        Command::Detect { exe } => commands::detect::run(&config, game_root, exe.as_deref()),
        Command::Cleanup => commands::cleanup::run(&config, game_root),
        Command::Scan { pattern, exe } => commands::scan::run(&pattern, &exe),
    }
}
