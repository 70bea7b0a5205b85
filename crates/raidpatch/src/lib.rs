//! # raidpatch
//!
//! Core library for the Dragon Ball FighterZ raid enabler.
//!
//! This crate provides:
//! - Byte signature scanning with wildcards (`pattern`)
//! - Raid patch set generation, all-or-nothing application and detection (`patch`)
//! - Steam installation discovery (`install`)
//! - Working copy management for the game executable (`workspace`)
//! - Launch shortcuts for the patched executable (`shortcut`)
//!
//! ## Example
//!
//! ```ignore
//! use raidpatch::{GameLocator, Patcher, RAID_RANGE};
//!
//! let paths = GameLocator::new().find_and_validate()?;
//! raidpatch::prepare_working_copy(&paths.clean_exe, &paths.patched_exe)?;
//!
//! let report = Patcher::new().apply(&paths.patched_exe, 12)?;
//! assert!(report.success);
//! assert_eq!(Patcher::new().detect_current(&paths.patched_exe, RAID_RANGE), Some(12));
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod install;
pub mod patch;
pub mod pattern;
pub mod raid;
pub mod shortcut;
pub mod workspace;

pub use config::{RaidpatchConfig, RaidpatchConfigBuilder};
pub use error::{Error, Result};
pub use image::{FsImageStore, ImageStore};
pub use install::{GameLocator, GamePaths};
pub use patch::{
    Patch, PatchKind, PatchReport, PatchSet, Patcher, apply_to_buffer, build_patch_set,
    contains_parameter, detect_in_buffer, encode_parameter,
};
pub use pattern::{Pattern, find, scan_and_replace};
pub use raid::{RAID_RANGE, all_raids, is_valid_raid_index, raid_display_name, raid_name};
pub use shortcut::{create_raid_shortcut, remove_raid_shortcuts, shortcut_file_name};
pub use workspace::{CleanupReport, cleanup, prepare_working_copy, verify_clean_exe};
