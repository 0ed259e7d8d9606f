//! Acquisition orchestrator.
//!
//! Composes the [`Downloader`] and the [`ArchiveInstaller`] into a single
//! "get" operation per package:
//!
//! ```text
//! PackageDescriptor ──url()──────────────▶ Downloader ──archive──▶ ArchiveInstaller
//!                   └─name/file_name()──▶ cache path                   │
//!                                                             <root>/src/<name>[_<ver>_<id>]
//! ```
//!
//! The first failure is returned unchanged; nothing is retried.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::package::PackageDescriptor;

use super::config::ManagerConfig;
use super::download::{Downloader, FetchOutcome, HttpTransport};
use super::error::{ManagerError, ManagerResult};
use super::extractor::ZipExtractor;
use super::fs::join_path;
use super::installer::{ArchiveInstaller, InstallOutcome};
use super::traits::{AcquireStage, ArchiveExtractor, ArchiveTransport, ProgressCallback};

/// Options for a single acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Replace an existing install directory.
    pub force_update: bool,
    /// Stop after the archive is in the cache.
    pub download_only: bool,
}

/// Result of a successful acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireReport {
    /// Cached archive path.
    pub archive: PathBuf,
    /// Whether the archive was downloaded or already cached.
    pub fetch: FetchOutcome,
    /// Install result; `None` for download-only acquisitions.
    pub install: Option<InstallOutcome>,
}

/// Expand a leading `~` in `path` to the current user's home directory.
pub fn expand_home(path: &Path) -> ManagerResult<PathBuf> {
    expand_home_with(path, dirs::home_dir().as_deref())
}

/// Expand a leading `~` in `path` against an explicit home directory.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use srcget::manager::expand_home_with;
///
/// let home = Path::new("/home/me");
/// assert_eq!(
///     expand_home_with(Path::new("~/.srcget/repos"), Some(home)).unwrap(),
///     Path::new("/home/me/.srcget/repos")
/// );
/// assert_eq!(
///     expand_home_with(Path::new("/var/cache"), None).unwrap(),
///     Path::new("/var/cache")
/// );
/// ```
pub fn expand_home_with(path: &Path, home: Option<&Path>) -> ManagerResult<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = home.ok_or(ManagerError::HomeDirUnavailable)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Cache file for a package under an already expanded repos directory.
///
/// # Format
///
/// `<repos_dir>/<name segments...>/<file_name>`
pub fn cache_path(repos_dir: &Path, pkg: &PackageDescriptor) -> PathBuf {
    join_path(repos_dir, pkg.segments()).join(pkg.file_name())
}

/// Downloads and installs packages.
pub struct Acquirer<T: ArchiveTransport = HttpTransport, E: ArchiveExtractor = ZipExtractor> {
    downloader: Downloader<T>,
    installer: ArchiveInstaller<E>,
    repos_dir: PathBuf,
    on_progress: Option<ProgressCallback>,
}

impl Acquirer<HttpTransport, ZipExtractor> {
    /// Create an acquirer backed by HTTP and zip extraction.
    pub fn from_config(config: &ManagerConfig) -> ManagerResult<Self> {
        let transport = HttpTransport::with_settings(config.timeout, &config.user_agent)?;
        Self::new(
            Downloader::new(transport),
            ArchiveInstaller::new(config.root_dir.clone()),
            &config.repos_dir,
        )
    }
}

impl<T: ArchiveTransport, E: ArchiveExtractor> Acquirer<T, E> {
    /// Create an acquirer from its parts.
    ///
    /// `repos_dir` has `~` expanded and is made absolute against the
    /// current directory.
    pub fn new(
        downloader: Downloader<T>,
        installer: ArchiveInstaller<E>,
        repos_dir: &Path,
    ) -> ManagerResult<Self> {
        let repos_dir = expand_home(repos_dir)?;
        let repos_dir = if repos_dir.is_absolute() {
            repos_dir
        } else {
            std::env::current_dir()
                .map_err(|e| ManagerError::ReadFailed {
                    path: PathBuf::from("."),
                    source: e,
                })?
                .join(repos_dir)
        };

        Ok(Self {
            downloader,
            installer,
            repos_dir,
            on_progress: None,
        })
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// The expanded cache root.
    pub fn repos_dir(&self) -> &Path {
        &self.repos_dir
    }

    /// The downloader.
    pub fn downloader(&self) -> &Downloader<T> {
        &self.downloader
    }

    /// The installer.
    pub fn installer(&self) -> &ArchiveInstaller<E> {
        &self.installer
    }

    /// Cache file for a package.
    pub fn cache_path(&self, pkg: &PackageDescriptor) -> PathBuf {
        cache_path(&self.repos_dir, pkg)
    }

    /// Install directory for a package.
    pub fn install_path(&self, pkg: &PackageDescriptor) -> PathBuf {
        self.installer.install_path(pkg)
    }

    /// Download and install a package without forcing an update.
    pub fn acquire(&self, pkg: &PackageDescriptor) -> ManagerResult<AcquireReport> {
        self.acquire_with(pkg, AcquireOptions::default())
    }

    /// Download and install a package.
    pub fn acquire_with(
        &self,
        pkg: &PackageDescriptor,
        options: AcquireOptions,
    ) -> ManagerResult<AcquireReport> {
        let report = |stage: AcquireStage, message: &str| {
            if let Some(ref cb) = self.on_progress {
                cb(stage, message);
            }
        };

        let archive = self.cache_path(pkg);
        let fetch = self
            .downloader
            .fetch_with_progress(&pkg.url(), &archive, &report)?;

        if options.download_only {
            report(
                AcquireStage::Complete,
                &format!("Downloaded {} to {}", pkg, archive.display()),
            );
            return Ok(AcquireReport {
                archive,
                fetch,
                install: None,
            });
        }

        let install = self.installer.install_with_progress(
            pkg,
            &archive,
            options.force_update,
            &report,
        )?;

        let message = match &install {
            InstallOutcome::Installed { path, files } => {
                format!("Installed {} ({} files) to {}", pkg, files, path.display())
            }
            InstallOutcome::AlreadyInstalled { path } => {
                format!("{} is already installed at {}", pkg, path.display())
            }
        };
        info!("{}", message);
        report(AcquireStage::Complete, &message);

        Ok(AcquireReport {
            archive,
            fetch,
            install: Some(install),
        })
    }
}
