//! Filesystem probes and helpers shared by the downloader and installer.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ManagerError, ManagerResult};

/// Mode for every directory the manager creates (subject to umask).
pub const DIR_MODE: u32 = 0o777;

/// Check if `path` exists and is a directory.
pub fn dir_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Check if `path` exists and is not a directory.
pub fn file_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Join segments onto a base path, one component per segment.
///
/// Empty segments are skipped.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use srcget::manager::join_path;
///
/// let path = join_path(Path::new("/root/src"), ["example.org", "", "foo"]);
/// assert_eq!(path, Path::new("/root/src/example.org/foo"));
/// ```
pub fn join_path<I, S>(base: &Path, segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = base.to_path_buf();
    for segment in segments {
        let segment = segment.as_ref();
        if !segment.is_empty() {
            path.push(segment);
        }
    }
    path
}

/// Create a directory and all missing parents.
pub fn create_dir_all(path: &Path) -> ManagerResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder
        .create(path)
        .map_err(|e| ManagerError::CreateDirFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Recursively remove a directory tree.
pub fn remove_dir_all(path: &Path) -> ManagerResult<()> {
    fs::remove_dir_all(path).map_err(|e| ManagerError::RemoveFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_and_file_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(dir_exists(temp.path()));
        assert!(!file_exists(temp.path()));
        assert!(file_exists(&file));
        assert!(!dir_exists(&file));
        assert!(!dir_exists(&temp.path().join("missing")));
        assert!(!file_exists(&temp.path().join("missing")));
    }

    #[test]
    fn test_join_path() {
        let path = join_path(Path::new("/base"), ["a", "b", "c"]);
        assert_eq!(path, PathBuf::from("/base/a/b/c"));

        let empty: [&str; 0] = [];
        assert_eq!(join_path(Path::new("/base"), empty), PathBuf::from("/base"));
    }

    #[test]
    fn test_create_dir_all_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");

        create_dir_all(&nested).unwrap();
        assert!(dir_exists(&nested));

        // Existing directories are fine
        create_dir_all(&nested).unwrap();
    }

    #[test]
    fn test_create_dir_all_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        let err = create_dir_all(&file.join("sub")).unwrap_err();
        assert!(matches!(err, ManagerError::CreateDirFailed { .. }));
    }

    #[test]
    fn test_remove_dir_all_non_empty() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("sub/file.txt"), "x").unwrap();

        remove_dir_all(&dir).unwrap();
        assert!(!dir.exists());
    }
}
