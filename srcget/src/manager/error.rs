//! Error types for the package manager.

use std::io;
use std::path::PathBuf;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur while downloading or installing a package.
#[derive(Debug)]
pub enum ManagerError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a directory tree.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// HTTP transport failed before or while receiving the body.
    DownloadFailed { url: String, reason: String },

    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },

    /// The archive has an extension the installer cannot unpack.
    UnsupportedFormat { path: PathBuf },

    /// The archive could not be opened or one of its entries is invalid.
    ExtractionFailed { path: PathBuf, reason: String },

    /// The home directory is needed to expand `~` but is unknown.
    HomeDirUnavailable,

    /// Invalid configuration.
    InvalidConfig(String),
}

impl ManagerError {
    /// Check if this error belongs to the I/O failure family.
    ///
    /// Network and filesystem problems are I/O failures; an unsupported
    /// archive format and configuration problems are not.
    pub fn is_io_failure(&self) -> bool {
        !matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::InvalidConfig(_) | Self::HomeDirUnavailable
        )
    }
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            Self::DownloadFailed { url, reason } => {
                write!(f, "failed to download {}: {}", url, reason)
            }
            Self::HttpStatus { url, status } => {
                write!(f, "failed to download {}: HTTP status {}", url, status)
            }
            Self::UnsupportedFormat { path } => {
                write!(f, "unsupported archive format: {}", path.display())
            }
            Self::ExtractionFailed { path, reason } => {
                write!(f, "failed to extract {}: {}", path.display(), reason)
            }
            Self::HomeDirUnavailable => write!(f, "cannot determine the home directory"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::RemoveFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
