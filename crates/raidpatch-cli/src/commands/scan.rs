//! Scan command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use raidpatch::{FsImageStore, ImageStore, Pattern, find};

use super::hex_utils::{format_bytes, format_hex_offset};

/// Bytes shown after the match
const CONTEXT_LEN: usize = 16;

/// Run the scan command
pub fn run(pattern: &str, exe: &Path) -> Result<()> {
    let pattern: Pattern = pattern.parse()?;
    let image = FsImageStore
        .read(exe)
        .with_context(|| format!("Failed to read {}", exe.display()))?;

    println!(
        "Searching for pattern: {} ({} bytes)",
        pattern,
        pattern.len()
    );

    let Some(offset) = find(&image, &pattern) else {
        bail!("Pattern not found in {}", exe.display());
    };

    let end = (offset + pattern.len().max(CONTEXT_LEN)).min(image.len());
    println!("Found at {}", format_hex_offset(offset));
    println!("  {}", format_bytes(&image[offset..end]));

    Ok(())
}
