//! Working copy lifecycle.
//!
//! Patches always go to a fresh copy of the clean executable; the clean
//! executable itself is never written.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::shortcut::remove_raid_shortcuts;

/// Fail with [`Error::CleanExeMissing`] unless the clean executable exists.
pub fn verify_clean_exe(clean_exe: &Path) -> Result<()> {
    if !clean_exe.is_file() {
        error!("Clean executable not found: {}", clean_exe.display());
        return Err(Error::CleanExeMissing(clean_exe.to_path_buf()));
    }

    info!("Clean exe verified: {}", clean_exe.display());
    Ok(())
}

/// Replace the working copy with a fresh copy of the clean executable.
pub fn prepare_working_copy(clean_exe: &Path, working_copy: &Path) -> Result<()> {
    verify_clean_exe(clean_exe)?;

    if working_copy.exists() {
        info!("Removing old patched exe: {}", working_copy.display());
        if let Err(e) = fs::remove_file(working_copy) {
            // The copy below overwrites it anyway
            warn!("Could not remove old patched exe: {}", e);
        }
    }

    info!("Creating fresh patched exe from clean exe");
    fs::copy(clean_exe, working_copy).map_err(|e| {
        error!("Failed to create patched exe: {}", e);
        Error::WorkingCopy(format!(
            "copy {} -> {}: {}",
            clean_exe.display(),
            working_copy.display(),
            e
        ))
    })?;

    info!("Patched exe ready: {}", working_copy.display());
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub patched_exe_removed: bool,
    pub shortcuts_removed: usize,
    pub errors: Vec<String>,
}

/// Remove the working copy, if any, and every raid shortcut in `shortcut_dir`.
pub fn cleanup(working_copy: &Path, shortcut_dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    if working_copy.exists() {
        info!("Removing patched exe: {}", working_copy.display());
        match fs::remove_file(working_copy) {
            Ok(()) => {
                report.patched_exe_removed = true;
                info!("Patched exe removed successfully");
            }
            Err(e) => {
                let msg = format!("Failed to remove patched exe: {}", e);
                error!("{}", msg);
                report.errors.push(msg);
            }
        }
    } else {
        info!("Patched exe not found, nothing to remove");
    }

    let shortcuts = remove_raid_shortcuts(shortcut_dir);
    report.shortcuts_removed = shortcuts.removed;
    report.errors.extend(shortcuts.errors);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_verify_clean_exe() {
        let dir = tempdir().unwrap();
        let clean = dir.path().join("RED-Win64-Shipping.exe");
        assert!(matches!(
            verify_clean_exe(&clean),
            Err(Error::CleanExeMissing(_))
        ));

        fs::write(&clean, b"MZ").unwrap();
        assert!(verify_clean_exe(&clean).is_ok());
    }

    #[test]
    fn test_prepare_working_copy_replaces_stale_copy() {
        let dir = tempdir().unwrap();
        let clean = dir.path().join("clean.exe");
        let working = dir.path().join("patched.exe");
        fs::write(&clean, b"clean bytes").unwrap();
        fs::write(&working, b"stale patched bytes").unwrap();

        prepare_working_copy(&clean, &working).unwrap();
        assert_eq!(fs::read(&working).unwrap(), b"clean bytes");
        assert_eq!(fs::read(&clean).unwrap(), b"clean bytes");
    }

    #[test]
    fn test_prepare_working_copy_without_clean() {
        let dir = tempdir().unwrap();
        let err =
            prepare_working_copy(&dir.path().join("clean.exe"), &dir.path().join("w.exe"))
                .unwrap_err();
        assert!(matches!(err, Error::CleanExeMissing(_)));
    }

    #[test]
    fn test_cleanup() {
        let dir = tempdir().unwrap();
        let working = dir.path().join("patched.exe");

        assert_eq!(cleanup(&working, dir.path()), CleanupReport::default());

        fs::write(&working, b"patched").unwrap();
        let report = cleanup(&working, dir.path());
        assert!(report.patched_exe_removed);
        assert!(report.errors.is_empty());
        assert!(!working.exists());
    }

    #[test]
    fn test_cleanup_removes_raid_shortcuts() {
        let dir = tempdir().unwrap();
        let working = dir.path().join("patched.exe");
        let clean = dir.path().join("clean.exe");
        fs::write(&working, b"patched").unwrap();
        fs::write(&clean, b"clean").unwrap();
        fs::write(dir.path().join("DBFZ Raid 4 - Cell.lnk"), b"").unwrap();
        fs::write(dir.path().join("DBFZ Raid 9 - Broly.lnk"), b"").unwrap();

        let report = cleanup(&working, dir.path());
        assert_eq!(
            report,
            CleanupReport {
                patched_exe_removed: true,
                shortcuts_removed: 2,
                errors: Vec::new(),
            }
        );
        assert!(clean.exists());
        assert!(!dir.path().join("DBFZ Raid 4 - Cell.lnk").exists());
    }

    #[test]
    fn test_cleanup_reports_unreadable_shortcut_dir() {
        let dir = tempdir().unwrap();
        let report = cleanup(&dir.path().join("patched.exe"), &dir.path().join("missing"));
        assert!(!report.patched_exe_removed);
        assert_eq!(report.shortcuts_removed, 0);
        assert_eq!(report.errors.len(), 1);
    }
}
