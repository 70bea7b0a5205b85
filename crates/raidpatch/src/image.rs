//! Loading and persisting executable images.
//!
//! [`ImageStore`] is the seam between the patch engine and the filesystem.
//! [`FsImageStore`] replaces the target through a sibling temp file so a
//! failed write never leaves a truncated executable behind.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Whole-file byte storage
pub trait ImageStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents at `path` with `data`.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

impl<S: ImageStore + ?Sized> ImageStore for &S {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        (**self).write(path, data)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageStore;

impl ImageStore for FsImageStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;

        // Keep the original permissions on the replacement file
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(temp.path(), metadata.permissions())?;
        }

        debug!(
            "Persisting {} bytes to {} via {}",
            data.len(),
            path.display(),
            temp.path().display()
        );
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
pub use mock::MemoryImageStore;


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.exe");
        fs::write(&path, [0x4D, 0x5A, 0x90, 0x00]).unwrap();

        let store = FsImageStore;
        assert!(store.exists(&path));
        assert_eq!(store.read(&path).unwrap(), [0x4D, 0x5A, 0x90, 0x00]);

        store.write(&path, &[0x4D, 0x5A, 0xB8, 0x01, 0x02]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), [0x4D, 0x5A, 0xB8, 0x01, 0x02]);
    }

    #[test]
    fn test_fs_store_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.exe");
        fs::write(&path, b"original").unwrap();

        FsImageStore.write(&path, b"patched").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_fs_store_write_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("game.exe");
        assert!(FsImageStore.write(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_fs_store_read_missing() {
        let dir = tempdir().unwrap();
        let err = FsImageStore.read(&dir.path().join("nope.exe")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
