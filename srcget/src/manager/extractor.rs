//! Archive extraction for package installation.
//!
//! Archives produced by the "download zip" feature of code-hosting services
//! wrap their content in one top-level directory named after the revision
//! (`repo-master/`, `org-repo-1a2b3c/`). This module handles:
//! - Recognising supported archive formats
//! - Stripping the wrapper directory from every entry
//! - Recreating the remaining directory structure under the destination

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use super::error::{ManagerError, ManagerResult};
use super::fs::{create_dir_all, join_path};
use super::traits::ArchiveExtractor;

/// Buffer size for copying entry contents (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Archive formats the installer can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// A zip archive.
    Zip,
}

impl ArchiveFormat {
    /// Recognise the format of `path` from its extension.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use srcget::manager::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_path(Path::new("trunk.ZIP")), Some(ArchiveFormat::Zip));
    /// assert_eq!(ArchiveFormat::from_path(Path::new("trunk.tar")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => Some(Self::Zip),
            _ => None,
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Destination-relative segments of an archive entry.
///
/// Drops the wrapper directory. Returns `Ok(None)` when nothing is left and
/// an error when a remaining segment would escape the destination.
pub fn strip_wrapper(entry_name: &str) -> Result<Option<Vec<&str>>, String> {
    let segments: Vec<&str> = entry_name
        .split('/')
        .skip(1)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return Ok(None);
    }
    if let Some(bad) = segments.iter().find(|s| !is_safe_segment(s)) {
        return Err(format!("entry '{}' has invalid segment '{}'", entry_name, bad));
    }

    Ok(Some(segments))
}

fn is_safe_segment(segment: &str) -> bool {
    if segment == "." || segment == ".." || segment.contains('\\') {
        return false;
    }
    // Drive prefixes and alternate data streams.
    if cfg!(windows) && segment.contains(':') {
        return false;
    }
    true
}

/// Zip archive extractor.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new zip extractor.
    pub fn new() -> Self {
        Self
    }

    fn extract_zip(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        let file = File::open(archive).map_err(|e| ManagerError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = ZipArchive::new(file).map_err(|e| ManagerError::ExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut files = 0;

        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| ManagerError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: e.to_string(),
                })?;

            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            let segments = match strip_wrapper(&name) {
                Ok(Some(segments)) => segments,
                Ok(None) => continue,
                Err(reason) => {
                    return Err(ManagerError::ExtractionFailed {
                        path: archive.to_path_buf(),
                        reason,
                    })
                }
            };

            if segments.len() > 1 {
                create_dir_all(&join_path(dest_dir, &segments[..segments.len() - 1]))?;
            }

            let target = join_path(dest_dir, &segments);
            debug!(entry = %name, target = %target.display(), "extracting");
            copy_entry(&mut entry, &target, archive)?;
            files += 1;
        }

        Ok(files)
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        self.extract_zip(archive, dest_dir)
    }
}

/// Copy one entry's contents into a new file at `target`.
fn copy_entry(entry: &mut dyn Read, target: &Path, archive: &Path) -> ManagerResult<()> {
    let file = File::create(target).map_err(|e| ManagerError::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = entry
            .read(&mut buffer)
            .map_err(|e| ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: format!("failed to read entry for {}: {}", target.display(), e),
            })?;

        if bytes_read == 0 {
            break;
        }

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(|e| ManagerError::WriteFailed {
                path: target.to_path_buf(),
                source: e,
            })?;
    }

    writer.flush().map_err(|e| ManagerError::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })
}

/// Write a zip archive with the given `(name, contents)` entries.
///
/// Names ending in `/` become directory entries.
#[cfg(test)]
pub(crate) fn write_test_zip(path: &Path, entries: &[(&str, &str)]) -> std::io::Result<()> {
    use zip::write::FileOptions;

    let file = File::create(path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default();

    for (name, contents) in entries {
        if let Some(dir) = name.strip_suffix('/') {
            writer.add_directory(dir, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(contents.as_bytes())?;
        }
    }

    writer.finish()?;
    Ok(())
}
