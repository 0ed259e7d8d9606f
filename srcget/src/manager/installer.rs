//! Package installer for unpacking archives into the source tree.
//!
//! This module owns the install layout and policy:
//! 1. Compute the versioned install directory under `<root>/src`
//! 2. Skip packages that are already installed unless an update is forced
//! 3. Reject archive formats that cannot be unpacked
//! 4. Extract into a staging directory next to the install directory
//! 5. Swap the staging directory into place
//!
//! Extraction never writes into the live install directory, so a failed or
//! interrupted update leaves the previous install untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::package::PackageDescriptor;

use super::error::{ManagerError, ManagerResult};
use super::extractor::{ArchiveFormat, ZipExtractor};
use super::fs::{create_dir_all, dir_exists, join_path, remove_dir_all};
use super::traits::{AcquireStage, ArchiveExtractor};

/// Name of the directory under the root that holds installed sources.
pub const SRC_DIR: &str = "src";

/// Result of an install call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The archive was extracted.
    Installed {
        /// Install directory.
        path: PathBuf,
        /// Number of files extracted.
        files: usize,
    },
    /// The install directory already existed and no update was requested.
    AlreadyInstalled {
        /// Install directory.
        path: PathBuf,
    },
}

impl InstallOutcome {
    /// Install directory of the package.
    pub fn path(&self) -> &Path {
        match self {
            Self::Installed { path, .. } | Self::AlreadyInstalled { path } => path,
        }
    }

    /// Check if the call was a no-op.
    pub fn is_already_installed(&self) -> bool {
        matches!(self, Self::AlreadyInstalled { .. })
    }
}

/// Unpacks package archives into `<root>/src`.
#[derive(Debug)]
pub struct ArchiveInstaller<E: ArchiveExtractor = ZipExtractor> {
    root: PathBuf,
    extractor: E,
}

impl ArchiveInstaller<ZipExtractor> {
    /// Create an installer for the given root using the zip extractor.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extractor(root, ZipExtractor::new())
    }
}

impl<E: ArchiveExtractor> ArchiveInstaller<E> {
    /// Create an installer with a custom extractor.
    pub fn with_extractor(root: impl Into<PathBuf>, extractor: E) -> Self {
        Self {
            root: root.into(),
            extractor,
        }
    }

    /// The install root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `src` directory under the root.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join(SRC_DIR)
    }

    /// Install directory for a package.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use srcget::manager::ArchiveInstaller;
    /// use srcget::package::{PackageDescriptor, Version};
    ///
    /// let installer = ArchiveInstaller::new("/go");
    /// let pkg =
    ///     PackageDescriptor::new("example.org/foo/bar", Version::Pinned("v1".into()), "5").unwrap();
    ///
    /// assert_eq!(installer.install_path(&pkg), Path::new("/go/src/example.org/foo/bar_v1_5"));
    /// ```
    pub fn install_path(&self, pkg: &PackageDescriptor) -> PathBuf {
        join_path(&self.src_dir(), pkg.install_segments())
    }

    /// Check if the package's install directory exists.
    pub fn is_installed(&self, pkg: &PackageDescriptor) -> bool {
        dir_exists(&self.install_path(pkg))
    }

    /// Install `pkg` from a local archive.
    pub fn install(
        &self,
        pkg: &PackageDescriptor,
        archive: &Path,
        force_update: bool,
    ) -> ManagerResult<InstallOutcome> {
        self.install_with_progress(pkg, archive, force_update, &|_, _| {})
    }

    /// Install `pkg` from a local archive, reporting when extraction starts.
    ///
    /// Without `force_update` an existing install directory makes this a
    /// no-op. With it, the directory is replaced by the archive's contents
    /// so files from the previous install do not survive.
    pub fn install_with_progress(
        &self,
        pkg: &PackageDescriptor,
        archive: &Path,
        force_update: bool,
        on_progress: &dyn Fn(AcquireStage, &str),
    ) -> ManagerResult<InstallOutcome> {
        let dst_dir = self.install_path(pkg);

        if !force_update && dir_exists(&dst_dir) {
            debug!(path = %dst_dir.display(), "package already installed");
            return Ok(InstallOutcome::AlreadyInstalled { path: dst_dir });
        }

        if ArchiveFormat::from_path(archive).is_none() {
            return Err(ManagerError::UnsupportedFormat {
                path: archive.to_path_buf(),
            });
        }

        let message = format!("Extracting package {} ...", pkg.name());
        info!("{}", message);
        on_progress(AcquireStage::Extracting, &message);

        let staging = StagingDir::create(&dst_dir)?;
        let files = self.extractor.extract(archive, staging.path())?;

        if dir_exists(&dst_dir) {
            if !force_update {
                // Another install of the same package finished first.
                return Ok(InstallOutcome::AlreadyInstalled { path: dst_dir });
            }
            remove_dir_all(&dst_dir)?;
        }
        if let Err(e) = staging.commit(&dst_dir) {
            if !force_update && dir_exists(&dst_dir) {
                return Ok(InstallOutcome::AlreadyInstalled { path: dst_dir });
            }
            return Err(e);
        }

        info!(path = %dst_dir.display(), files, "package installed");
        Ok(InstallOutcome::Installed {
            path: dst_dir,
            files,
        })
    }
}

/// Sibling directory that receives an archive before it goes live.
///
/// Removed on drop unless committed.
#[derive(Debug)]
struct StagingDir {
    path: PathBuf,
    committed: bool,
}

impl StagingDir {
    /// Create a fresh staging directory next to `target`.
    fn create(target: &Path) -> ManagerResult<Self> {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let parent = target.parent().ok_or_else(|| {
            ManagerError::InvalidConfig(format!(
                "install directory {} has no parent",
                target.display()
            ))
        })?;
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        create_dir_all(parent)?;

        let path = parent.join(format!(
            ".{}.staging-{}-{}",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        if path.exists() {
            remove_dir_all(&path)?;
        }
        create_dir_all(&path)?;

        Ok(Self {
            path,
            committed: false,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staging directory to `target`.
    fn commit(mut self, target: &Path) -> ManagerResult<()> {
        fs::rename(&self.path, target).map_err(|e| ManagerError::WriteFailed {
            path: target.to_path_buf(),
            source: e,
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.committed {
            fs::remove_dir_all(&self.path).ok(); // Best effort cleanup
        }
    }
}
