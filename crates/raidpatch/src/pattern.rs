//! Byte signatures with wildcard support.
//!
//! A [`Pattern`] is written as space-separated hex bytes where `??` (or `?`)
//! matches any byte, e.g. `"48 8D 0D ?? ?? ?? ??"`. Scanning is a plain
//! leftmost-first linear search; patterns are short and only a handful are
//! applied per image.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Ordered sequence of byte matchers. `None` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<Option<u8>>);

impl Pattern {
    /// Build a pattern from raw matchers. Empty patterns are rejected.
    pub fn new(bytes: Vec<Option<u8>>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidPattern("Signature pattern is empty".to_string()));
        }
        Ok(Self(bytes))
    }

    /// Pattern that matches `bytes` exactly.
    pub fn exact(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Option<u8>] {
        &self.0
    }

    /// Whether the pattern matches `window`, which must be exactly `len()` bytes.
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.0.len()
            && self
                .0
                .iter()
                .zip(window)
                .all(|(expected, actual)| expected.is_none_or(|b| b == *actual))
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_pattern(s).map(Self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(&self.0))
    }
}

pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::InvalidPattern(format!("Invalid signature token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::InvalidPattern("Signature pattern is empty".to_string()));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leftmost offset where `pattern` matches `buffer`.
pub fn find(buffer: &[u8], pattern: &Pattern) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() {
        return None;
    }

    let last = buffer.len() - pattern.len();

    'outer: for i in 0..=last {
        for (j, byte) in pattern.as_slice().iter().enumerate() {
            if let Some(value) = byte
                && buffer[i + j] != *value
            {
                continue 'outer;
            }
        }
        return Some(i);
    }

    None
}

/// Find `pattern` and overwrite `replacement.len()` bytes starting at the match.
///
/// The replacement may be longer than the pattern; bytes past the matched
/// window are overwritten as well. Returns `Ok(None)` without touching the
/// buffer when nothing matches, and fails without touching the buffer when the
/// replacement would run past the end.
pub fn scan_and_replace(
    buffer: &mut [u8],
    pattern: &Pattern,
    replacement: &[u8],
) -> Result<Option<usize>> {
    let Some(offset) = find(buffer, pattern) else {
        return Ok(None);
    };

    let end = offset
        .checked_add(replacement.len())
        .filter(|&end| end <= buffer.len())
        .ok_or(Error::ReplacementOutOfBounds {
            offset,
            len: replacement.len(),
            buffer_len: buffer.len(),
        })?;

    buffer[offset..end].copy_from_slice(replacement);
    Ok(Some(offset))
}
