use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read executable {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write executable {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} pattern scan failed")]
    PatternNotFound(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error(
        "Replacement of {len} bytes at offset {offset:#x} exceeds buffer length {buffer_len:#x}"
    )]
    ReplacementOutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("Steam installation not found")]
    SteamNotFound,

    #[error("Dragon Ball FighterZ not found in any Steam library")]
    GameNotFound,

    #[error("Installation at {} appears corrupted: {reason}", .root.display())]
    InvalidInstallation { root: PathBuf, reason: String },

    #[error(
        "Original game executable not found at {}. Please verify game files via Steam.",
        .0.display()
    )]
    CleanExeMissing(PathBuf),

    #[error("Failed to prepare working copy: {0}")]
    WorkingCopy(String),

    #[error("Failed to create shortcut {}: {message}", .path.display())]
    Shortcut { path: PathBuf, message: String },

    #[error("VDF parse error: {0}")]
    Vdf(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io(e)
            | Error::ReadFailed { source: e, .. }
            | Error::WriteFailed { source: e, .. } => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
