use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::detect::{contains_parameter, detect_in_buffer};
use super::set::build_patch_set;
use crate::error::{Error, Result};
use crate::image::{FsImageStore, ImageStore};
use crate::pattern::scan_and_replace;

/// Outcome of applying one patch set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub success: bool,
    /// Matched offset per patch name
    pub offsets: BTreeMap<String, usize>,
    pub errors: Vec<String>,
}

impl PatchReport {
    pub fn offset(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }
}

/// Applies, verifies and detects raid patches on executable images.
pub struct Patcher<S: ImageStore = FsImageStore> {
    store: S,
}

impl Patcher<FsImageStore> {
    pub fn new() -> Self {
        Self::with_store(FsImageStore)
    }
}

impl Default for Patcher<FsImageStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageStore> Patcher<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Apply every patch for `parameter` to the file at `path`.
    ///
    /// The file is rewritten only if all patches matched. Per-patch failures
    /// are collected in the report; read and write failures are returned as
    /// errors.
    pub fn apply(&self, path: &Path, parameter: u32) -> Result<PatchReport> {
        info!(
            "Starting patch process for raid {} on {}",
            parameter,
            path.display()
        );

        let mut image = self.store.read(path).map_err(|source| {
            error!("Failed to read executable: {}", source);
            Error::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let report = apply_to_buffer(&mut image, parameter);

        if !report.success {
            error!("Patching failed - executable not modified");
            return Ok(report);
        }

        self.store.write(path, &image).map_err(|source| {
            error!("Failed to write patched executable: {}", source);
            Error::WriteFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("Patched executable written successfully");

        Ok(report)
    }

    /// Check whether the raid getter in `path` is patched to `parameter`.
    ///
    /// Unreadable files count as not patched.
    pub fn verify(&self, path: &Path, parameter: u32) -> bool {
        match self.store.read(path) {
            Ok(image) => contains_parameter(&image, parameter),
            Err(e) => {
                error!("Verification failed: {}", e);
                false
            }
        }
    }

    /// Find which parameter in `valid` is currently patched into `path`.
    ///
    /// This is a heuristic: the first `B8 xx xx xx xx 90` window whose value
    /// lies in `valid` wins, and such a window can occur in unpatched code.
    pub fn detect_current(&self, path: &Path, valid: RangeInclusive<u32>) -> Option<u32> {
        if !self.store.exists(path) {
            debug!("Patched exe doesn't exist");
            return None;
        }

        let image = match self.store.read(path) {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to detect current patch: {}", e);
                return None;
            }
        };

        match detect_in_buffer(&image, valid) {
            Some(parameter) => {
                info!("Detected current patch: Raid {}", parameter);
                Some(parameter)
            }
            None => {
                debug!("No valid raid patch detected");
                None
            }
        }
    }
}

/// Apply the patch set for `parameter` to an in-memory image.
///
/// Every patch is attempted even after a failure. On failure the buffer
/// may hold partial edits and must not be persisted.
pub fn apply_to_buffer(image: &mut [u8], parameter: u32) -> PatchReport {
    let set = build_patch_set(parameter);
    let mut report = PatchReport::default();

    for patch in &set {
        let name = patch.name();
        debug!("Applying {} patch ({})", name, patch.pattern);

        match scan_and_replace(image, &patch.pattern, &patch.replacement) {
            Ok(Some(offset)) => {
                info!("{} patch applied at offset 0x{:X}", name, offset);
                report.offsets.insert(name.to_string(), offset);
            }
            Ok(None) => {
                let err = Error::PatternNotFound(name.to_string());
                warn!("Pattern '{}' not found in executable", patch.pattern);
                error!("{}", err);
                report.errors.push(err.to_string());
            }
            Err(e) => {
                error!("{} patch could not be written: {}", name, e);
                report.errors.push(format!("{}: {}", name, e));
            }
        }
    }

    report.success = report.errors.is_empty();
    report
}
