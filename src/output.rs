use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::error::Error;

/// Writes `bytes` to `destination` by way of a temporary file in the same
/// directory that is renamed into place once fully written and synced.
/// On failure the temporary file is removed and any existing file at
/// `destination` is left as it was.
pub fn write_atomic(bytes: &[u8], destination: &Path) -> Result<(), Error> {
    let write_error = |source: io::Error| Error::Write {
        path: destination.to_path_buf(),
        source,
    };
    let directory = parent_dir(destination);
    let mut file = NamedTempFile::new_in(&directory).map_err(write_error)?;
    debug!(temp = %file.path().display(), "writing {} bytes", bytes.len());
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(destination).map_err(|err| write_error(err.error))?;
    Ok(())
}

/// Returns the directory a path lives in, treating a bare file name as
/// relative to the current directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.ico");
        write_atomic(b"hello", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.icns");
        fs::write(&path, b"old contents").unwrap();
        write_atomic(b"new", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("icon.ico");
        match write_atomic(b"data", &path) {
            Err(Error::Write { path: reported, .. }) => {
                assert_eq!(reported, path)
            }
            other => panic!("expected a write error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn destination_directory_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();
        assert!(matches!(write_atomic(b"data", &target),
                         Err(Error::Write { .. })));
        assert!(target.join("keep").exists());
        // Only the occupied directory remains; the temporary file is gone.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        assert_eq!(parent_dir(Path::new("icon.ico")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("out/icon.ico")),
                   PathBuf::from("out"));
    }
}
