//! Package manager: download archives and install them into the source tree.
//!
//! This module provides the acquisition pipeline:
//!
//! - `fs`: existence probes and directory helpers
//! - `download`: cache-by-presence archive download over HTTP
//! - `extractor`: zip extraction with wrapper-directory stripping
//! - `installer`: versioned install directories and install/update policy
//! - `orchestrator`: download followed by install, one package per call
//!
//! # Example
//!
//! ```ignore
//! use srcget::manager::{Acquirer, ManagerConfig};
//! use srcget::package::parse_package;
//!
//! let config = ManagerConfig::new("/home/me/go");
//! let acquirer = Acquirer::from_config(&config)?;
//! let pkg = parse_package("github.com/org/repo", Some("tag:v1.0"))?;
//! acquirer.acquire(&pkg)?;
//! ```

mod config;
pub mod download;
mod error;
mod extractor;
mod fs;
mod installer;
mod orchestrator;
mod traits;

pub use config::{ManagerConfig, DEFAULT_REPOS_DIR};
pub use download::{Downloader, FetchOutcome, HttpTransport, InFlightDownloads};
pub use error::{ManagerError, ManagerResult};
pub use extractor::{strip_wrapper, ArchiveFormat, ZipExtractor};
pub use fs::{create_dir_all, dir_exists, file_exists, join_path, remove_dir_all, DIR_MODE};
pub use installer::{ArchiveInstaller, InstallOutcome, SRC_DIR};
pub use orchestrator::{
    cache_path, expand_home, expand_home_with, AcquireOptions, AcquireReport, Acquirer,
};
pub use traits::{AcquireStage, ArchiveExtractor, ArchiveTransport, ProgressCallback};
