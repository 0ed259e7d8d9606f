//! Archive download for package acquisition.
//!
//! This module provides:
//! - Single-shot HTTP GET of an archive body (`http`)
//! - Cache-by-presence download into the repos directory (`downloader`)
//! - Tracking of in-flight downloads keyed by cache path (`inflight`)
//!
//! # Architecture
//!
//! ```text
//! Downloader (cache check, directory creation, streaming)
//!         │
//!         ├── ArchiveTransport (trait)
//!         │       └── HttpTransport
//!         │
//!         └── InFlightDownloads (one writer per cache file)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use srcget::manager::download::{Downloader, HttpTransport};
//!
//! let downloader = Downloader::new(HttpTransport::new()?);
//! downloader.fetch(
//!     "https://github.com/org/repo/archive/master.zip",
//!     Path::new("/home/me/.srcget/repos/github.com/org/repo/trunk.zip"),
//! )?;
//! ```

mod downloader;
mod http;
mod inflight;

pub use downloader::{Downloader, FetchOutcome};
pub use http::{HttpTransport, DEFAULT_USER_AGENT};
pub use inflight::{InFlightDownloads, InFlightGuard};
