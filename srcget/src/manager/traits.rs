//! Seams of the package manager.
//!
//! The downloader and installer depend on these traits rather than on
//! concrete network or archive code, so tests can swap in in-memory doubles.

use std::io::Read;
use std::path::Path;

use super::error::ManagerResult;

/// Stages of a single package acquisition, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStage {
    /// Fetching the archive over the network.
    Downloading,
    /// Unpacking the archive into the source tree.
    Extracting,
    /// The package is in place.
    Complete,
}

impl AcquireStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Downloading => "Downloading",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        }
    }
}

/// Progress callback for acquisitions.
///
/// # Arguments
///
/// * `stage` - Current acquisition stage
/// * `message` - Human-readable message
pub type ProgressCallback = Box<dyn Fn(AcquireStage, &str) + Send + Sync>;

/// Blocking transport that opens an archive body for reading.
pub trait ArchiveTransport: Send + Sync {
    /// Issue a single GET for `url`.
    ///
    /// Returns the response body once the server has answered with a
    /// success status. Transport errors and non-success statuses are errors.
    fn get(&self, url: &str) -> ManagerResult<Box<dyn Read + Send>>;
}

/// Unpacks an archive into a directory.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest_dir`, which must already exist.
    ///
    /// Returns the number of files written.
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize>;
}
