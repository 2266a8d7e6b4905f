// src/file_store.rs
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

use crate::error::{VirtphpError, VirtphpResult};

/// The filesystem primitives teardown is built on.
pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Remove `path` and everything under it. A path that is already gone is not an error.
    fn remove(&self, path: &Path) -> VirtphpResult<()>;

    fn read_file(&self, path: &Path) -> VirtphpResult<Vec<u8>>;

    /// Replace the whole contents of `path` with `contents`.
    fn write_file(&self, path: &Path, contents: &[u8]) -> VirtphpResult<()>;
}

/// `FileStore` backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn remove(&self, path: &Path) -> VirtphpResult<()> {
        let removal_failed = |source| VirtphpError::RemovalFailed {
            path: path.to_path_buf(),
            source,
        };

        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(removal_failed(e)),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(removal_failed)
        } else {
            fs::remove_file(path).map_err(removal_failed)
        }
    }

    fn read_file(&self, path: &Path) -> VirtphpResult<Vec<u8>> {
        fs::read(path).map_err(|source| VirtphpError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> VirtphpResult<()> {
        let write_failed = |source| VirtphpError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        // Write through a symlinked destination so the link itself survives.
        let target = match fs::symlink_metadata(path) {
            Ok(m) if m.file_type().is_symlink() => fs::canonicalize(path).map_err(write_failed)?,
            _ => path.to_path_buf(),
        };

        // Stage next to the destination so the rename stays on one filesystem.
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            // Same default as a freshly created file: 0666 minus the umask.
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let mut staged = builder.tempfile_in(parent).map_err(write_failed)?;
        staged.write_all(contents).map_err(write_failed)?;

        if let Ok(existing) = fs::metadata(&target) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(write_failed)?;
        }

        staged.as_file().sync_all().map_err(write_failed)?;
        staged.persist(&target).map_err(|e| write_failed(e.error))?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_directory_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("env");
        fs::create_dir_all(root.join(".virtphp/bin")).unwrap();
        fs::write(root.join(".virtphp/bin/php"), b"#!/bin/sh").unwrap();

        let store = LocalFileStore;
        assert!(store.exists(&root));
        store.remove(&root).unwrap();
        assert!(!store.exists(&root));
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let tmp = TempDir::new().unwrap();
        LocalFileStore.remove(&tmp.path().join("gone")).unwrap();
    }

    #[test]
    fn test_write_file_overwrites_in_full() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("environments.json");
        fs::write(&file, b"{\"a\":\"/a\",\"b\":\"/b\"}").unwrap();

        LocalFileStore.write_file(&file, b"{}").unwrap();

        assert_eq!(LocalFileStore.read_file(&file).unwrap(), b"{}");
        // only the destination is left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFileStore
            .read_file(&tmp.path().join("missing.json"))
            .unwrap_err();
        assert!(matches!(err, VirtphpError::ReadFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("environments.json");
        fs::write(&file, b"{\"a\":\"/a\"}").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        LocalFileStore.write_file(&file, b"{}").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read(&file).unwrap(), b"{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        // fs::write creates with 0666 minus the umask
        let reference = tmp.path().join("reference.json");
        fs::write(&reference, b"{}").unwrap();
        let file = tmp.path().join("environments.json");

        LocalFileStore.write_file(&file, b"{}").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&file), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_through_symlink() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("shared").join("environments.json");
        fs::create_dir_all(real.parent().unwrap()).unwrap();
        fs::write(&real, b"{\"a\":\"/a\"}").unwrap();
        let link = tmp.path().join("environments.json");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        LocalFileStore.write_file(&link, b"{}").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"{}");
        assert_eq!(fs::read(&link).unwrap(), b"{}");
    }

    #[test]
    fn test_failed_replace_leaves_destination_and_no_staging_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a rename, even by root.
        let dest = tmp.path().join("environments.json");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("keep"), b"original").unwrap();

        let err = LocalFileStore.write_file(&dest, b"{}").unwrap_err();

        assert!(matches!(err, VirtphpError::WriteFailed { .. }));
        assert_eq!(fs::read(dest.join("keep")).unwrap(), b"original");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_into_read_only_dir_keeps_original() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".virtphp");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("environments.json");
        fs::write(&file, b"{\"myenv\":\"/envs/myenv\"}").unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores directory permissions; nothing to check there
        let enforced = fs::File::create(dir.join("check")).is_err();
        let result = LocalFileStore.write_file(&file, b"{}");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(matches!(result, Err(VirtphpError::WriteFailed { .. })));
            assert_eq!(fs::read(&file).unwrap(), b"{\"myenv\":\"/envs/myenv\"}");
            assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
        }
    }
}
