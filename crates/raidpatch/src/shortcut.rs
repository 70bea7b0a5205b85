//! Launch shortcuts (`.lnk`) pointing at the patched executable.
//!
//! Shortcuts live in the game root and are named
//! `DBFZ Raid {index} - {name}.lnk`, so the active raid is visible from the
//! file name alone. Only one is kept at a time.

use std::fs;
use std::path::{Path, PathBuf};

use mslnk::ShellLink;
use tracing::{error, info, warn};

use crate::error::{Error, Result};

const SHORTCUT_PREFIX: &str = "DBFZ Raid ";
const SHORTCUT_EXTENSION: &str = "lnk";

pub fn shortcut_file_name(raid: u32, raid_name: &str) -> String {
    format!("{}{} - {}.{}", SHORTCUT_PREFIX, raid, raid_name, SHORTCUT_EXTENSION)
}

/// Whether `path` names a shortcut created by [`create_raid_shortcut`].
pub fn is_raid_shortcut(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SHORTCUT_EXTENSION));

    name.starts_with(SHORTCUT_PREFIX) && has_extension
}

/// Raid shortcuts currently present in `dir`, sorted by path.
pub fn find_raid_shortcuts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut shortcuts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_raid_shortcut(&path) {
            shortcuts.push(path);
        }
    }
    shortcuts.sort();
    Ok(shortcuts)
}

/// Outcome of removing raid shortcuts from a directory
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RemovedShortcuts {
    pub removed: usize,
    pub errors: Vec<String>,
}

/// Delete every raid shortcut in `dir`, collecting failures.
pub fn remove_raid_shortcuts(dir: &Path) -> RemovedShortcuts {
    let mut result = RemovedShortcuts::default();

    let shortcuts = match find_raid_shortcuts(dir) {
        Ok(shortcuts) => shortcuts,
        Err(e) => {
            let msg = format!("Error scanning for shortcuts in {}: {}", dir.display(), e);
            error!("{}", msg);
            result.errors.push(msg);
            return result;
        }
    };

    for shortcut in shortcuts {
        let name = shortcut
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Removing shortcut: {}", name);
        match fs::remove_file(&shortcut) {
            Ok(()) => result.removed += 1,
            Err(e) => {
                let msg = format!("Failed to remove shortcut {}: {}", name, e);
                error!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    result
}

/// Write a shortcut at `shortcut_path` that launches `target_exe` from its
/// own directory, using the executable's icon.
pub fn create_shortcut(target_exe: &Path, shortcut_path: &Path, raid_name: &str) -> Result<()> {
    info!("Creating shortcut: {}", shortcut_path.display());
    let shortcut_error = |message: String| Error::Shortcut {
        path: shortcut_path.to_path_buf(),
        message,
    };

    let mut link = ShellLink::new(target_exe).map_err(|e| shortcut_error(e.to_string()))?;
    link.set_working_dir(target_exe.parent().map(|dir| dir.display().to_string()));
    link.set_icon_location(Some(target_exe.display().to_string()));
    link.set_name(Some(format!("DBFZ Raid: {}", raid_name)));
    link.create_lnk(shortcut_path)
        .map_err(|e| shortcut_error(e.to_string()))?;

    info!("Shortcut created successfully: {}", raid_name);
    Ok(())
}

/// Replace any raid shortcuts in `dir` with one for `raid`.
///
/// Failing to delete an old shortcut is only logged; the returned error is
/// about the new one.
pub fn create_raid_shortcut(
    dir: &Path,
    target_exe: &Path,
    raid: u32,
    raid_name: &str,
) -> Result<PathBuf> {
    let old = remove_raid_shortcuts(dir);
    for e in &old.errors {
        warn!("{}", e);
    }

    let shortcut_path = dir.join(shortcut_file_name(raid, raid_name));
    create_shortcut(target_exe, &shortcut_path, raid_name)?;
    Ok(shortcut_path)
}
